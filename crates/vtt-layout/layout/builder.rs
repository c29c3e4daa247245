//! Candidate cue box construction
//!
//! Turns a cue's settings and parsed text into the box it would occupy before
//! collision avoidance: inline position and size from `position`, `size` and
//! the resolved position alignment, block size from the number of wrapped
//! lines. Text is measured through [`TextMeasurer`] so hosts with real font
//! metrics can plug them in; [`EstimatedMeasurer`] is the built-in fallback.

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_width::UnicodeWidthChar;

use crate::{
    bidi::Direction,
    config::{LayoutConfig, DEFAULT_GLYPH_ADVANCE_RATIO},
    cue::{Cue, PositionAlign, WritingMode},
    geometry::{ContainerBox, LayoutBox},
    markup::CueTree,
};

/// Source of glyph advances for line wrapping
pub trait TextMeasurer: Send {
    /// Advance of `ch` along the line at the given line height
    fn advance(&self, ch: char, line_height: f64) -> f64;

    /// Advance of a whole run
    fn measure(&self, text: &str, line_height: f64) -> f64 {
        text.chars().map(|ch| self.advance(ch, line_height)).sum()
    }
}

/// Font-free measurer using a fixed advance per character class
///
/// Each character advances `ratio * line_height` per terminal column it
/// occupies: East Asian wide characters take two columns, combining marks
/// and format controls none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMeasurer {
    ratio: f64,
}

impl EstimatedMeasurer {
    /// Create a measurer with the given advance ratio
    #[must_use]
    pub const fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Create a measurer using the configured advance ratio
    #[must_use]
    pub const fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.glyph_advance_ratio)
    }

    /// Advance ratio of a regular character
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl Default for EstimatedMeasurer {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPH_ADVANCE_RATIO)
    }
}

impl TextMeasurer for EstimatedMeasurer {
    fn advance(&self, ch: char, line_height: f64) -> f64 {
        let columns = UnicodeWidthChar::width(ch).unwrap_or(0);
        columns as f64 * self.ratio * line_height
    }
}

/// Greedily wrap `text` into lines no wider than `max_width`
///
/// Lines break only at UAX #14 break opportunities and always at hard line
/// breaks. A segment that does not fit on a line of its own is split by
/// character. Every line holds at least one character, so a non-positive
/// width yields one character per line.
///
/// # Example
///
/// ```rust
/// use vtt_layout::layout::{wrap_text, EstimatedMeasurer};
///
/// // 10px per character at line height 20
/// let lines = wrap_text("one two three\nfour", 70.0, 20.0, &EstimatedMeasurer::default());
/// assert_eq!(lines, vec!["one two", "three", "four"]);
/// ```
pub fn wrap_text(
    text: &str,
    max_width: f64,
    line_height: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let text = text.trim();
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut start = 0;

    for (end, opportunity) in linebreaks(text) {
        let segment = &text[start..end];
        start = end;

        let mut joined = line.clone();
        joined.push_str(segment);
        if !line.trim().is_empty() && measurer.measure(joined.trim(), line_height) > max_width {
            lines.push(line.trim().to_owned());
            joined = segment.to_owned();
        }
        line = joined;

        if measurer.measure(line.trim(), line_height) > max_width {
            let overflow = core::mem::take(&mut line);
            let content = overflow.trim();
            break_segment(content, max_width, line_height, measurer, &mut lines, &mut line);
            line.push_str(&overflow[overflow.trim_end().len()..]);
        }

        if matches!(opportunity, BreakOpportunity::Mandatory) {
            lines.push(line.trim().to_owned());
            line.clear();
        }
    }

    if lines.is_empty() || !line.trim().is_empty() {
        lines.push(line.trim().to_owned());
    }
    lines
}

/// Split an oversize segment across lines; the unfinished tail stays in `line`
fn break_segment(
    segment: &str,
    max_width: f64,
    line_height: f64,
    measurer: &dyn TextMeasurer,
    lines: &mut Vec<String>,
    line: &mut String,
) {
    let mut width = 0.0;
    for ch in segment.chars() {
        let advance = measurer.advance(ch, line_height);
        if !line.is_empty() && width + advance > max_width {
            lines.push(core::mem::take(line));
            width = 0.0;
        }
        line.push(ch);
        width += advance;
    }
}

/// Box a cue would occupy before collision avoidance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateBox {
    /// Candidate box with the text line height
    pub bbox: LayoutBox,
    /// Number of wrapped lines (columns for vertical cues)
    pub line_count: usize,
}

/// Builds candidate boxes for cues inside a container
pub struct CueBoxBuilder<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> CueBoxBuilder<'a> {
    /// Create a builder
    #[must_use]
    pub const fn new(config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self { config, measurer }
    }

    /// Text line height inside `container`
    #[must_use]
    pub fn line_height(&self, container: &ContainerBox) -> f64 {
        container.height() / self.config.horizontal_line_slots
    }

    /// Build the candidate box for `cue`
    ///
    /// A cue with no visible text gets a zero-sized box at its inline start
    /// and a line count of zero.
    #[must_use]
    pub fn build(
        &self,
        cue: &Cue,
        tree: &CueTree,
        direction: Direction,
        container: &ContainerBox,
    ) -> CandidateBox {
        let line_height = self.line_height(container);
        let position = cue.computed_position();
        let align = cue.computed_position_align(direction);
        let size = fitted_size(cue.clamped_size(), position, align);
        let start = match align {
            PositionAlign::Center => position - size / 2.0,
            PositionAlign::LineRight => position - size,
            PositionAlign::LineLeft | PositionAlign::Auto => position,
        };

        let vertical = cue.vertical.is_vertical();
        let (inline_origin, inline_extent) = if vertical {
            (container.top, container.height())
        } else {
            (container.left, container.width())
        };
        let inline_start = inline_origin + start / 100.0 * inline_extent;
        let inline_size = size / 100.0 * inline_extent;

        let text = tree.renderable_text();
        let line_count = if tree.has_renderable_text() {
            wrap_text(&text, inline_size, line_height, self.measurer).len()
        } else {
            0
        };
        let (inline_size, block_size) = if line_count == 0 {
            (0.0, 0.0)
        } else {
            (inline_size, line_count as f64 * line_height)
        };

        let bbox = match cue.vertical {
            WritingMode::Horizontal => LayoutBox::new(
                inline_start,
                container.top,
                inline_size,
                block_size,
                line_height,
            ),
            WritingMode::VerticalRl => LayoutBox::new(
                container.right - block_size,
                inline_start,
                block_size,
                inline_size,
                line_height,
            ),
            WritingMode::VerticalLr => LayoutBox::new(
                container.left,
                inline_start,
                block_size,
                inline_size,
                line_height,
            ),
        };

        CandidateBox { bbox, line_count }
    }
}

/// Largest size not exceeding `size` that keeps the box inside `[0, 100]`
fn fitted_size(size: f64, position: f64, align: PositionAlign) -> f64 {
    let limit = match align {
        PositionAlign::LineRight => position,
        PositionAlign::Center => 2.0 * position.min(100.0 - position),
        PositionAlign::LineLeft | PositionAlign::Auto => 100.0 - position,
    };
    size.min(limit)
}
