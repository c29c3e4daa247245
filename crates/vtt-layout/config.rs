//! Layout engine configuration
//!
//! Holds the line-slot granularity used by snap-to-line positioning, the
//! glyph advance estimate used by the default text measurer, the search step
//! limit and the pass-cache switch.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::LayoutConfig;
//!
//! let config = LayoutConfig::default()
//!     .with_horizontal_line_slots(20.0)
//!     .with_cache(false);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.horizontal_line_slots, 20.0);
//! ```

use crate::{LayoutError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Line slots across the container height for horizontal cues
pub const DEFAULT_HORIZONTAL_LINE_SLOTS: f64 = 15.0;

/// Line slots across the container width for vertical cues
pub const DEFAULT_VERTICAL_LINE_SLOTS: f64 = 100.0;

/// Average glyph advance as a fraction of the line height
pub const DEFAULT_GLYPH_ADVANCE_RATIO: f64 = 0.5;

/// Upper bound on moves per axis during best-position search
pub const DEFAULT_MAX_SEARCH_STEPS: usize = 10_000;

/// Configuration for a layout pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Number of line slots the container height is divided into for
    /// horizontal cues. Also sets the text line height.
    pub horizontal_line_slots: f64,
    /// Number of line slots the container width is divided into for
    /// vertical cues
    pub vertical_line_slots: f64,
    /// Glyph advance of a regular character relative to the line height,
    /// used by [`EstimatedMeasurer`](crate::layout::EstimatedMeasurer)
    pub glyph_advance_ratio: f64,
    /// Hard cap on box moves along a single search axis
    pub max_search_steps: usize,
    /// Reuse the previous pass when nothing changed
    pub cache_enabled: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_line_slots: DEFAULT_HORIZONTAL_LINE_SLOTS,
            vertical_line_slots: DEFAULT_VERTICAL_LINE_SLOTS,
            glyph_advance_ratio: DEFAULT_GLYPH_ADVANCE_RATIO,
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
            cache_enabled: true,
        }
    }
}

impl LayoutConfig {
    /// Set the horizontal line slot count
    #[must_use]
    pub const fn with_horizontal_line_slots(mut self, slots: f64) -> Self {
        self.horizontal_line_slots = slots;
        self
    }

    /// Set the vertical line slot count
    #[must_use]
    pub const fn with_vertical_line_slots(mut self, slots: f64) -> Self {
        self.vertical_line_slots = slots;
        self
    }

    /// Set the glyph advance ratio
    #[must_use]
    pub const fn with_glyph_advance_ratio(mut self, ratio: f64) -> Self {
        self.glyph_advance_ratio = ratio;
        self
    }

    /// Set the per-axis search step cap
    #[must_use]
    pub const fn with_max_search_steps(mut self, steps: usize) -> Self {
        self.max_search_steps = steps;
        self
    }

    /// Enable or disable the pass cache
    #[must_use]
    pub const fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Check that every value can drive a layout pass
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] for non-finite or non-positive
    /// slot counts, a negative or non-finite advance ratio, or a zero step cap.
    pub fn validate(&self) -> Result<()> {
        if !self.horizontal_line_slots.is_finite() || self.horizontal_line_slots <= 0.0 {
            return Err(LayoutError::config(format_args!(
                "horizontal_line_slots must be positive, got {}",
                self.horizontal_line_slots
            )));
        }
        if !self.vertical_line_slots.is_finite() || self.vertical_line_slots <= 0.0 {
            return Err(LayoutError::config(format_args!(
                "vertical_line_slots must be positive, got {}",
                self.vertical_line_slots
            )));
        }
        if !self.glyph_advance_ratio.is_finite() || self.glyph_advance_ratio < 0.0 {
            return Err(LayoutError::config(format_args!(
                "glyph_advance_ratio must be non-negative, got {}",
                self.glyph_advance_ratio
            )));
        }
        if self.max_search_steps == 0 {
            return Err(LayoutError::config("max_search_steps must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.cache_enabled);
        assert!((config.horizontal_line_slots - 15.0).abs() < f64::EPSILON);
        assert!((config.vertical_line_slots - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_slots() {
        let err = LayoutConfig::default()
            .with_horizontal_line_slots(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
        assert!(err.to_string().contains("horizontal_line_slots"));

        assert!(LayoutConfig::default()
            .with_vertical_line_slots(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_zero_step_cap() {
        assert!(LayoutConfig::default()
            .with_max_search_steps(0)
            .validate()
            .is_err());
    }

    #[test]
    fn builder_chain() {
        let config = LayoutConfig::default()
            .with_glyph_advance_ratio(0.6)
            .with_cache(false);
        assert!(!config.cache_enabled);
        assert!((config.glyph_advance_ratio - 0.6).abs() < f64::EPSILON);
    }
}
