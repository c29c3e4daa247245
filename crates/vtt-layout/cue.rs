//! Cue record and WebVTT placement settings
//!
//! Callers map their caption source onto [`Cue`]; nothing here knows about
//! the WebVTT file format. Timing fields are carried for identity only.
//!
//! Settings accept their WebVTT keywords through `FromStr`, which is the only
//! fallible part of this module.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::{Align, Cue, LinePosition, WritingMode};
//!
//! let cue = Cue::new("intro", 1.0, 4.0, "<v Joe>Hello</v>")
//!     .with_line(LinePosition::Number(-2.0))
//!     .with_align("center".parse::<Align>()?)
//!     .with_vertical("".parse::<WritingMode>()?);
//! assert!(cue.snap_to_lines);
//! assert_eq!(cue.nominal_line(), -2.0);
//! # Ok::<(), vtt_layout::LayoutError>(())
//! ```

use core::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::{bidi::Direction, utils::hash_f64, LayoutError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cue line setting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinePosition {
    /// Let the engine pick the line (last line for snap-to-line cues)
    #[default]
    Auto,
    /// Line index when snapping to lines, percentage otherwise
    Number(f64),
}

/// Cue position setting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CuePosition {
    /// Derived from the text alignment
    #[default]
    Auto,
    /// Percentage of the container's inline dimension
    Percent(f64),
}

/// Cue text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Align {
    /// Start edge of the paragraph direction
    Start,
    /// Centered
    #[default]
    Center,
    /// End edge of the paragraph direction
    End,
    /// Line-left regardless of direction
    Left,
    /// Line-right regardless of direction
    Right,
}

/// Cue position alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionAlign {
    /// Derived from the text alignment and direction
    #[default]
    Auto,
    /// Position marks the line-left edge of the box
    LineLeft,
    /// Position marks the center of the box
    Center,
    /// Position marks the line-right edge of the box
    LineRight,
}

/// Alignment of the cue box relative to its line position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineAlign {
    /// Line position marks the start edge
    #[default]
    Start,
    /// Line position marks the center
    Center,
    /// Line position marks the end edge
    End,
}

/// Writing mode from the `vertical` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WritingMode {
    /// `""`: horizontal lines stacked top to bottom
    #[default]
    Horizontal,
    /// `"rl"`: vertical columns stacked right to left
    VerticalRl,
    /// `"lr"`: vertical columns stacked left to right
    VerticalLr,
}

impl WritingMode {
    /// Whether lines run vertically
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::Horizontal)
    }

    /// WebVTT keyword for this mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "",
            Self::VerticalRl => "rl",
            Self::VerticalLr => "lr",
        }
    }
}

impl FromStr for WritingMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "horizontal" => Ok(Self::Horizontal),
            "rl" => Ok(Self::VerticalRl),
            "lr" => Ok(Self::VerticalLr),
            other => Err(LayoutError::invalid_setting("vertical", other)),
        }
    }
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "start" => Ok(Self::Start),
            "center" | "middle" => Ok(Self::Center),
            "end" => Ok(Self::End),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(LayoutError::invalid_setting("align", other)),
        }
    }
}

impl FromStr for PositionAlign {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "auto" => Ok(Self::Auto),
            "line-left" | "start" | "left" => Ok(Self::LineLeft),
            "center" | "middle" => Ok(Self::Center),
            "line-right" | "end" | "right" => Ok(Self::LineRight),
            other => Err(LayoutError::invalid_setting("positionAlign", other)),
        }
    }
}

impl FromStr for LineAlign {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "start" => Ok(Self::Start),
            "center" | "middle" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => Err(LayoutError::invalid_setting("lineAlign", other)),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(keyword)
    }
}

/// A timed caption payload with placement settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cue {
    /// Cue identifier
    pub id: String,
    /// Start time in seconds (not interpreted)
    pub start_time: f64,
    /// End time in seconds (not interpreted)
    pub end_time: f64,
    /// Raw cue markup
    pub text: String,
    /// Line setting
    pub line: LinePosition,
    /// Whether `line` is a slot index (true) or a percentage (false)
    pub snap_to_lines: bool,
    /// Position setting
    pub position: CuePosition,
    /// Position alignment setting
    pub position_align: PositionAlign,
    /// Text alignment setting
    pub align: Align,
    /// Box size as a percentage of the inline dimension
    pub size: f64,
    /// Writing mode
    pub vertical: WritingMode,
    /// Line alignment setting
    pub line_align: LineAlign,
}

impl Default for Cue {
    fn default() -> Self {
        Self {
            id: String::new(),
            start_time: 0.0,
            end_time: 0.0,
            text: String::new(),
            line: LinePosition::Auto,
            snap_to_lines: true,
            position: CuePosition::Auto,
            position_align: PositionAlign::Auto,
            align: Align::Center,
            size: 100.0,
            vertical: WritingMode::Horizontal,
            line_align: LineAlign::Start,
        }
    }
}

impl Cue {
    /// Create a cue with WebVTT default settings
    pub fn new(id: impl Into<String>, start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the line setting
    #[must_use]
    pub fn with_line(mut self, line: LinePosition) -> Self {
        self.line = line;
        self
    }

    /// Switch between line-slot and percentage positioning
    #[must_use]
    pub fn with_snap_to_lines(mut self, snap: bool) -> Self {
        self.snap_to_lines = snap;
        self
    }

    /// Set the position setting
    #[must_use]
    pub fn with_position(mut self, position: CuePosition) -> Self {
        self.position = position;
        self
    }

    /// Set the position alignment
    #[must_use]
    pub fn with_position_align(mut self, align: PositionAlign) -> Self {
        self.position_align = align;
        self
    }

    /// Set the text alignment
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the size percentage
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the writing mode
    #[must_use]
    pub fn with_vertical(mut self, vertical: WritingMode) -> Self {
        self.vertical = vertical;
        self
    }

    /// Set the line alignment
    #[must_use]
    pub fn with_line_align(mut self, align: LineAlign) -> Self {
        self.line_align = align;
        self
    }

    /// Line value used to order cues within a pass (`Auto` sorts as `-1`)
    #[must_use]
    pub const fn nominal_line(&self) -> f64 {
        match self.line {
            LinePosition::Auto => -1.0,
            LinePosition::Number(n) => n,
        }
    }

    /// Size clamped to `[0, 100]`
    #[must_use]
    pub fn clamped_size(&self) -> f64 {
        clamp_percent(self.size)
    }

    /// Position percentage after resolving `Auto` against the alignment
    #[must_use]
    pub fn computed_position(&self) -> f64 {
        match self.position {
            CuePosition::Percent(p) => clamp_percent(p),
            CuePosition::Auto => match self.align {
                Align::Left => 0.0,
                Align::Right => 100.0,
                Align::Start | Align::Center | Align::End => 50.0,
            },
        }
    }

    /// Position alignment after resolving `Auto` against alignment and
    /// paragraph direction
    #[must_use]
    pub const fn computed_position_align(&self, direction: Direction) -> PositionAlign {
        match self.position_align {
            PositionAlign::Auto => match (self.align, direction) {
                (Align::Left, _) | (Align::Start, Direction::Ltr) | (Align::End, Direction::Rtl) => {
                    PositionAlign::LineLeft
                }
                (Align::Right, _) | (Align::End, Direction::Ltr) | (Align::Start, Direction::Rtl) => {
                    PositionAlign::LineRight
                }
                (Align::Center, _) => PositionAlign::Center,
            },
            explicit => explicit,
        }
    }
}

/// Clamp a percentage into `[0, 100]`, mapping NaN to 0
fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

impl Hash for LinePosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Auto => state.write_u8(0),
            Self::Number(n) => {
                state.write_u8(1);
                hash_f64(*n, state);
            }
        }
    }
}

impl Hash for CuePosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Auto => state.write_u8(0),
            Self::Percent(p) => {
                state.write_u8(1);
                hash_f64(*p, state);
            }
        }
    }
}

impl Hash for Cue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        hash_f64(self.start_time, state);
        hash_f64(self.end_time, state);
        self.text.hash(state);
        self.line.hash(state);
        self.snap_to_lines.hash(state);
        self.position.hash(state);
        self.position_align.hash(state);
        self.align.hash(state);
        hash_f64(self.size, state);
        self.vertical.hash(state);
        self.line_align.hash(state);
    }
}
