//! Error type for the few fallible operations at the crate boundary
//!
//! Parsing and layout are total: malformed markup degrades to plain text and
//! impossible placements degrade to best-effort positions. Only decoding
//! caller-supplied strings, decoding raw cue bytes and validating a
//! configuration can fail.
//!
//! # Error Philosophy
//!
//! - Use `thiserror` for structured error handling (no `anyhow` bloat)
//! - Keep the offending value in the error for caller diagnostics
//! - Errors are `Clone + PartialEq` so tests can compare them directly

use core::fmt;
use thiserror::Error;

/// Main error type for `vtt-layout` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A text direction string other than `ltr`/`rtl`
    #[error("Invalid direction '{0}': expected 'ltr' or 'rtl'")]
    InvalidDirection(String),

    /// A cue setting value that does not belong to the setting's keyword set
    #[error("Invalid value '{value}' for cue setting '{name}'")]
    InvalidSetting {
        /// Setting name (e.g. `align`, `vertical`)
        name: &'static str,
        /// Value supplied by the caller
        value: String,
    },

    /// Raw cue bytes handed to the text decoder were not valid UTF-8
    #[error("Invalid UTF-8 at byte {position}: {message}")]
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence
        position: usize,
        /// Decoder message
        message: String,
    },

    /// Layout configuration failed validation
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

/// Error category for filtering and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller-supplied keyword strings
    Format,
    /// Byte-to-text decoding
    Encoding,
    /// Engine configuration
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::Encoding => write!(f, "encoding"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

impl LayoutError {
    /// Create an invalid-setting error
    pub fn invalid_setting<T: fmt::Display>(name: &'static str, value: T) -> Self {
        Self::InvalidSetting {
            name,
            value: value.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::InvalidConfig(message.to_string())
    }

    /// Get the error category
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDirection(_) | Self::InvalidSetting { .. } => ErrorCategory::Format,
            Self::InvalidUtf8 { .. } => ErrorCategory::Encoding,
            Self::InvalidConfig(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if the caller can recover by falling back to a default
    ///
    /// A bad keyword can be replaced with the setting's default; undecodable
    /// bytes or a broken configuration cannot be rendered at all.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidDirection(_) | Self::InvalidSetting { .. })
    }
}

impl From<core::str::Utf8Error> for LayoutError {
    fn from(err: core::str::Utf8Error) -> Self {
        Self::InvalidUtf8 {
            position: err.valid_up_to(),
            message: err.to_string(),
        }
    }
}
