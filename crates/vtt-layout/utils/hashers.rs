//! Deterministic ahash fingerprints for the layout pass cache
//!
//! The pass cache compares whole inputs by fingerprint, so the hasher must be
//! seeded identically on every call. Floating point fields are hashed by
//! their bit patterns.

use ahash::{AHasher, RandomState};
use core::hash::{BuildHasher, Hash, Hasher};

/// Fixed seeds shared by every fingerprint
const FINGERPRINT_SEEDS: (u64, u64, u64, u64) =
    (0x1234_5678_9abc_def0, 0xfedc_ba98_7654_3210, 0x0f1e_2d3c_4b5a_6978, 0);

/// Create a deterministic hasher
///
/// # Example
///
/// ```rust
/// use std::hash::{Hash, Hasher};
/// use vtt_layout::utils::create_fingerprint_hasher;
///
/// let mut a = create_fingerprint_hasher();
/// let mut b = create_fingerprint_hasher();
/// "cue".hash(&mut a);
/// "cue".hash(&mut b);
/// assert_eq!(a.finish(), b.finish());
/// ```
#[must_use]
pub fn create_fingerprint_hasher() -> AHasher {
    let (k0, k1, k2, k3) = FINGERPRINT_SEEDS;
    RandomState::with_seeds(k0, k1, k2, k3).build_hasher()
}

/// Hash a single value with the fingerprint hasher
#[must_use]
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = create_fingerprint_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Feed an `f64` into a hasher by bit pattern
///
/// `-0.0` and `0.0` are folded together so geometrically equal inputs hash
/// the same.
pub fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    let normalized = if value == 0.0 { 0.0_f64 } else { value };
    state.write_u64(normalized.to_bits());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
        assert_ne!(fingerprint("hello"), fingerprint("world"));
    }

    #[test]
    fn signed_zero_folds() {
        let mut a = create_fingerprint_hasher();
        let mut b = create_fingerprint_hasher();
        hash_f64(0.0, &mut a);
        hash_f64(-0.0, &mut b);
        assert_eq!(a.finish(), b.finish());
    }
}
