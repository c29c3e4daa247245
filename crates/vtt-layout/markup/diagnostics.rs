//! Skip reasons recorded while building a cue tree
//!
//! The public parser never reports these; they exist so tests can assert on
//! why a token was dropped and so skips show up in trace logs.

use core::fmt;

/// Result of handling one markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseOutcome {
    /// Token changed the tree (or was consumed as text)
    Applied,
    /// Token was dropped
    Skipped(SkipReason),
}

/// Why a token was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SkipReason {
    /// Tag name outside the cue tag set
    UnknownTag(String),
    /// Tag that does not match `<name[.classes][ annotation]>`
    MalformedTag,
    /// Tag whose required parent is not the current scope
    MissingParent {
        tag: &'static str,
        required: &'static str,
    },
    /// Closing tag that does not match the innermost open tag
    MismatchedClose(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag(name) => write!(f, "unknown tag '{name}'"),
            Self::MalformedTag => write!(f, "malformed tag"),
            Self::MissingParent { tag, required } => {
                write!(f, "'{tag}' outside of '{required}'")
            }
            Self::MismatchedClose(name) => write!(f, "closing tag '{name}' does not match"),
        }
    }
}

/// A dropped token with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkupDiagnostic {
    /// Byte offset of the token in the raw cue text
    pub offset: usize,
    /// Raw token text
    pub token: String,
    /// Why it was dropped
    pub reason: SkipReason,
}

impl fmt::Display for MarkupDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}: {}", self.token, self.offset, self.reason)
    }
}
