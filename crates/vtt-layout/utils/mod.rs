//! Shared error type and hashing helpers

pub mod errors;
pub mod hashers;

pub use errors::{ErrorCategory, LayoutError};
pub use hashers::{create_fingerprint_hasher, fingerprint, hash_f64};
