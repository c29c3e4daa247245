//! Axis-aligned box geometry for cue layout
//!
//! [`LayoutBox`] stores edges rather than origin and size so that moving a box
//! along an axis and testing it against the container are plain edge
//! comparisons. Overlap is strict: boxes that only share an edge do not
//! overlap, and a box with zero width or height overlaps nothing.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::{Axis, LayoutBox};
//!
//! let container = LayoutBox::container(1280.0, 720.0);
//! let mut cue = LayoutBox::new(0.0, 672.0, 1280.0, 48.0, 48.0);
//! let placed = [cue];
//!
//! assert!(cue.within(&container));
//! cue.move_along(Axis::MinusY, None);
//! assert!(!cue.overlaps_any(&placed));
//! assert_eq!(cue.to_relative(&container).bottom, 48.0);
//! ```

use core::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::utils::hash_f64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of travel for a box during collision avoidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Towards larger x
    PlusX,
    /// Towards smaller x
    MinusX,
    /// Towards larger y (down)
    PlusY,
    /// Towards smaller y (up)
    MinusY,
}

impl Axis {
    /// Axis pointing the other way
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::PlusX => Self::MinusX,
            Self::MinusX => Self::PlusX,
            Self::PlusY => Self::MinusY,
            Self::MinusY => Self::PlusY,
        }
    }

    /// Whether travel is along x
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::PlusX | Self::MinusX)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlusX => "+x",
            Self::MinusX => "-x",
            Self::PlusY => "+y",
            Self::MinusY => "-y",
        };
        f.write_str(name)
    }
}

/// Rectangle with a line height used as the default step when moving
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutBox {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Distance moved per step when no explicit distance is given
    pub line_height: f64,
}

/// The overlay area cues are laid out in
pub type ContainerBox = LayoutBox;

impl LayoutBox {
    /// Create a box from its origin and size
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64, line_height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
            line_height,
        }
    }

    /// Container box anchored at the origin
    #[must_use]
    pub fn container(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height, 0.0)
    }

    /// Same size, new top-left corner
    #[must_use]
    pub fn with_origin(self, left: f64, top: f64) -> Self {
        Self::new(left, top, self.width(), self.height(), self.line_height)
    }

    /// Same edges, new step size
    #[must_use]
    pub const fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Horizontal extent
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point as `(x, y)`
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Whether the box has no area
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Translate along `axis` by `distance`, or by `line_height` when `None`
    pub fn move_along(&mut self, axis: Axis, distance: Option<f64>) {
        let distance = distance.unwrap_or(self.line_height);
        match axis {
            Axis::PlusX => {
                self.left += distance;
                self.right += distance;
            }
            Axis::MinusX => {
                self.left -= distance;
                self.right -= distance;
            }
            Axis::PlusY => {
                self.top += distance;
                self.bottom += distance;
            }
            Axis::MinusY => {
                self.top -= distance;
                self.bottom -= distance;
            }
        }
    }

    /// Strict intersection test; empty boxes overlap nothing
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Whether any box in `others` overlaps this one
    #[must_use]
    pub fn overlaps_any(&self, others: &[Self]) -> bool {
        others.iter().any(|other| self.overlaps(other))
    }

    /// Whether every edge lies inside or on the container's edges
    #[must_use]
    pub fn within(&self, container: &Self) -> bool {
        self.top >= container.top
            && self.bottom <= container.bottom
            && self.left >= container.left
            && self.right <= container.right
    }

    /// Whether the box sticks out of the container on the edge that travel
    /// along `axis` moves it away from
    #[must_use]
    pub fn overlaps_opposite_axis(&self, container: &Self, axis: Axis) -> bool {
        match axis {
            Axis::PlusX => self.left < container.left,
            Axis::MinusX => self.right > container.right,
            Axis::PlusY => self.top < container.top,
            Axis::MinusY => self.bottom > container.bottom,
        }
    }

    /// Fraction of this box's area covered by `other`
    ///
    /// Zero for disjoint boxes and for boxes without area.
    #[must_use]
    pub fn intersect_percentage(&self, other: &Self) -> f64 {
        let area = self.width() * self.height();
        if area <= 0.0 || !area.is_finite() {
            return 0.0;
        }
        let x = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let y = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        x * y / area
    }

    /// Offsets of this box from the container's edges
    #[must_use]
    pub fn to_relative(&self, container: &Self) -> RelativeOffsets {
        RelativeOffsets {
            top: self.top - container.top,
            bottom: container.bottom - self.bottom,
            left: self.left - container.left,
            padding_right: container.right - self.right,
            height: self.height(),
            width: self.width(),
        }
    }
}

impl Hash for LayoutBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.left, state);
        hash_f64(self.top, state);
        hash_f64(self.right, state);
        hash_f64(self.bottom, state);
        hash_f64(self.line_height, state);
    }
}

/// Box position expressed against the container, ready for styling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelativeOffsets {
    /// Distance from the container's top edge
    pub top: f64,
    /// Distance from the container's bottom edge
    pub bottom: f64,
    /// Distance from the container's left edge
    pub left: f64,
    /// Distance from the container's right edge
    pub padding_right: f64,
    /// Box height
    pub height: f64,
    /// Box width
    pub width: f64,
}
