//! Text decoding hook for callers that hold raw cue payload bytes
//!
//! Cue text reaching the markup parser must already be text. Hosts that
//! receive payloads as bytes run them through [`StringDecoder`] first; bytes
//! that are not UTF-8 are the single construction-time misuse the engine
//! reports as an error.

use crate::{markup::CueTree, Result};

/// Decoder from raw payload bytes to cue text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringDecoder {
    /// Strip a leading UTF-8 byte order mark
    strip_bom: bool,
}

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl StringDecoder {
    /// Create a decoder that keeps input bytes untouched
    #[must_use]
    pub const fn new() -> Self {
        Self { strip_bom: false }
    }

    /// Create a decoder that drops a leading byte order mark
    #[must_use]
    pub const fn stripping_bom() -> Self {
        Self { strip_bom: true }
    }

    /// Decode bytes into cue text
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidUtf8`](crate::LayoutError::InvalidUtf8)
    /// with the offset of the first invalid sequence.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vtt_layout::StringDecoder;
    ///
    /// let text = StringDecoder::new().decode(b"<i>hi</i>")?;
    /// assert_eq!(text, "<i>hi</i>");
    /// assert!(StringDecoder::new().decode(&[0xC3, 0x28]).is_err());
    /// # Ok::<(), vtt_layout::LayoutError>(())
    /// ```
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let bytes = if self.strip_bom {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        let text = core::str::from_utf8(bytes)?;
        Ok(text.to_owned())
    }

    /// Decode bytes and parse the result into a cue tree
    ///
    /// # Errors
    ///
    /// Fails only when decoding fails; parsing itself never does.
    pub fn parse(&self, bytes: &[u8]) -> Result<CueTree> {
        let text = self.decode(bytes)?;
        Ok(crate::markup::parse(&text))
    }
}
