//! Paragraph direction detection for parsed cue text
//!
//! The direction of a cue is decided by its first strong right-to-left
//! character in document order. Ruby annotations do not take part. Only the
//! first paragraph is examined: once a text run contains a line break, the
//! text before the break is scanned and detection stops.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::{bidi::detect_direction, markup::parse, Direction};
//!
//! assert_eq!(detect_direction(&parse("<i>Hello</i>")), Direction::Ltr);
//! assert_eq!(detect_direction(&parse("<i>שלום</i>")), Direction::Rtl);
//! ```

use core::{cmp::Ordering, fmt, str::FromStr};

use log::trace;

use crate::{markup::CueTree, LayoutError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Paragraph direction of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

impl Direction {
    /// CSS keyword for this direction
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    /// Whether this is [`Direction::Rtl`]
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

impl FromStr for Direction {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let keyword = s.trim();
        if keyword.eq_ignore_ascii_case("ltr") {
            Ok(Self::Ltr)
        } else if keyword.eq_ignore_ascii_case("rtl") {
            Ok(Self::Rtl)
        } else {
            Err(LayoutError::InvalidDirection(s.to_string()))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strong right-to-left code point ranges, inclusive, sorted and disjoint
const RTL_RANGES: &[(u32, u32)] = &[
    // Hebrew
    (0x05BE, 0x05BE),
    (0x05C0, 0x05C0),
    (0x05C3, 0x05C3),
    (0x05C6, 0x05C6),
    (0x05D0, 0x05EA),
    (0x05EF, 0x05F4),
    // Arabic
    (0x0608, 0x0608),
    (0x060B, 0x060B),
    (0x060D, 0x060D),
    (0x061B, 0x064A),
    (0x066D, 0x066F),
    (0x0671, 0x06D5),
    (0x06E5, 0x06E6),
    (0x06EE, 0x06EF),
    // Arabic, Syriac
    (0x06FA, 0x070D),
    (0x070F, 0x0710),
    (0x0712, 0x072F),
    // Arabic Supplement, Thaana
    (0x074D, 0x07A5),
    (0x07B1, 0x07B1),
    // NKo
    (0x07C0, 0x07EA),
    (0x07F4, 0x07F5),
    (0x07FA, 0x07FA),
    (0x07FE, 0x0815),
    // Samaritan
    (0x081A, 0x081A),
    (0x0824, 0x0824),
    (0x0828, 0x0828),
    (0x0830, 0x083E),
    // Mandaic, Syriac Supplement
    (0x0840, 0x0858),
    (0x085E, 0x085E),
    (0x0860, 0x086A),
    // Arabic Extended
    (0x0870, 0x088E),
    (0x08A0, 0x08C9),
    // Right-to-left mark
    (0x200F, 0x200F),
    // Hebrew presentation forms
    (0xFB1D, 0xFB1D),
    (0xFB1F, 0xFB28),
    (0xFB2A, 0xFB4F),
    // Arabic presentation forms
    (0xFB50, 0xFD3D),
    (0xFD50, 0xFDC7),
    (0xFDF0, 0xFDFC),
    (0xFE70, 0xFEFC),
    // Phoenician through Old Uyghur and friends
    (0x10800, 0x10FFF),
    // Mende Kikakui, Adlam, Indic Siyaq, Arabic mathematical symbols
    (0x1E800, 0x1EFFF),
];

/// Whether `ch` is a strong right-to-left character
///
/// # Example
///
/// ```rust
/// use vtt_layout::bidi::is_strong_rtl;
///
/// assert!(is_strong_rtl('א'));
/// assert!(is_strong_rtl('\u{200F}'));
/// assert!(!is_strong_rtl('a'));
/// assert!(!is_strong_rtl('1'));
/// ```
#[must_use]
pub fn is_strong_rtl(ch: char) -> bool {
    let code = u32::from(ch);
    RTL_RANGES
        .binary_search_by(|&(start, end)| {
            if end < code {
                Ordering::Less
            } else if start > code {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// What scanning one text run found
enum RunScan {
    /// A strong right-to-left character
    Rtl,
    /// A line break before any strong right-to-left character
    ParagraphEnd,
    /// Neither
    Continue,
}

/// Scan one text run; line breaks end the paragraph only when `bounded`
fn scan_run(text: &str, bounded: bool) -> RunScan {
    for ch in text.chars() {
        if bounded && (ch == '\n' || ch == '\r') {
            return RunScan::ParagraphEnd;
        }
        if is_strong_rtl(ch) {
            return RunScan::Rtl;
        }
    }
    RunScan::Continue
}

/// Detect the paragraph direction of a parsed cue
///
/// Returns [`Direction::Ltr`] for empty trees and for text with no strong
/// right-to-left character. A line break inside the first text run ends the
/// scan; line breaks in later runs do not.
#[must_use]
pub fn detect_direction(tree: &CueTree) -> Direction {
    let mut stack = vec![tree.root()];
    let mut first_run = true;

    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.is_ruby_text() {
            continue;
        }
        if let Some(text) = node.as_text() {
            let bounded = core::mem::replace(&mut first_run, false);
            match scan_run(text, bounded) {
                RunScan::Rtl => return Direction::Rtl,
                RunScan::ParagraphEnd => {
                    trace!("direction scan stopped at line break in node {}", id.index());
                    return Direction::Ltr;
                }
                RunScan::Continue => {}
            }
        }
        stack.extend(node.children().iter().rev().copied());
    }

    Direction::Ltr
}
