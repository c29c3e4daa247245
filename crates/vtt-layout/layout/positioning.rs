//! Line positioning and collision avoidance
//!
//! [`place`] moves a candidate box to the line its cue asks for, then
//! searches for the nearest spot inside the container that does not overlap
//! any box already placed in the pass.
//!
//! # Search
//!
//! Each search axis is tried in order from the specified position. A box is
//! pushed along the axis while it sticks out of the container behind it, or
//! while it is inside the container and overlaps a placed box. The first axis
//! that ends inside the container wins. Otherwise the axis end with the
//! largest share of its area inside the container is kept, and one more
//! search runs from there along the perpendicular axes; its result replaces
//! the kept one only if it fits or scores strictly higher.
//!
//! Every move is bounded, so placement always terminates. In the worst case
//! the box is returned at its specified position.

use log::trace;
use smallvec::SmallVec;

use crate::{
    config::LayoutConfig,
    cue::{Cue, LineAlign, LinePosition, WritingMode},
    geometry::{Axis, ContainerBox, LayoutBox},
};

/// Search axes in the order they are tried
type AxisOrder = SmallVec<[Axis; 4]>;

/// Place `candidate` for `cue` inside `container`, avoiding `placed`
///
/// `line_count_hint` is the number of wrapped lines still to be placed in the
/// pass, this cue included. It keeps positive snap-to-line indices from
/// pushing later cues out of the container.
///
/// Empty candidates are returned unchanged.
///
/// # Example
///
/// ```rust
/// use vtt_layout::{layout::place, Cue, LayoutBox, LayoutConfig};
///
/// let container = LayoutBox::container(1280.0, 720.0);
/// let candidate = LayoutBox::new(0.0, 0.0, 1280.0, 48.0, 48.0);
/// let cue = Cue::new("1", 0.0, 1.0, "Hello");
///
/// let first = place(candidate, &cue, &container, &[], 2, &LayoutConfig::default());
/// assert_eq!(first.bottom, 720.0);
///
/// let second = place(candidate, &cue, &container, &[first], 1, &LayoutConfig::default());
/// assert_eq!(second.bottom, first.top);
/// ```
#[must_use]
pub fn place(
    candidate: LayoutBox,
    cue: &Cue,
    container: &ContainerBox,
    placed: &[LayoutBox],
    line_count_hint: usize,
    config: &LayoutConfig,
) -> LayoutBox {
    if candidate.is_empty() {
        trace!("cue '{}' has an empty box, skipping placement", cue.id);
        return candidate;
    }

    let mut specified = candidate;
    let axes = if cue.snap_to_lines {
        snap_to_line(&mut specified, cue, container, line_count_hint, config)
    } else {
        percentage_line(&mut specified, cue, container)
    };

    let step = specified.line_height;
    if !step.is_finite() || step <= 0.0 {
        trace!("cue '{}' has no usable step ({step}), keeping specified position", cue.id);
        return specified;
    }

    let search = Search {
        container,
        placed,
        max_steps: config.max_search_steps,
    };
    search.run(specified, &axes)
}

/// Move `bbox` to its line slot and return the search axes
fn snap_to_line(
    bbox: &mut LayoutBox,
    cue: &Cue,
    container: &ContainerBox,
    line_count_hint: usize,
    config: &LayoutConfig,
) -> AxisOrder {
    let (mut axes, span, slots): (AxisOrder, f64, f64) = match cue.vertical {
        WritingMode::Horizontal => (
            SmallVec::from_slice(&[Axis::PlusY, Axis::MinusY]),
            container.height(),
            config.horizontal_line_slots,
        ),
        WritingMode::VerticalRl => (
            SmallVec::from_slice(&[Axis::MinusX, Axis::PlusX]),
            container.width(),
            config.vertical_line_slots,
        ),
        WritingMode::VerticalLr => (
            SmallVec::from_slice(&[Axis::PlusX, Axis::MinusX]),
            container.width(),
            config.vertical_line_slots,
        ),
    };

    let step = span / slots;
    bbox.line_height = step;

    let nominal = cue.nominal_line();
    let line = if nominal.is_finite() { nominal.round() } else { -1.0 };
    let line = if line >= 0.0 {
        line.min((slots - line_count_hint as f64).max(0.0))
    } else {
        line.max(-slots)
    };

    let initial_axis = axes[0];
    let mut offset = step * line;
    if line < 0.0 {
        offset += span;
        axes.reverse();
    }
    bbox.move_along(initial_axis, Some(offset));
    trace!(
        "cue '{}' snapped to line {line} (offset {offset} along {initial_axis})",
        cue.id
    );

    axes
}

/// Move `bbox` to its percentage line position and return the search axes
fn percentage_line(bbox: &mut LayoutBox, cue: &Cue, container: &ContainerBox) -> AxisOrder {
    let span = if cue.vertical.is_vertical() {
        container.width()
    } else {
        container.height()
    };

    let mut percent = match cue.line {
        LinePosition::Number(value) if !value.is_nan() => value.clamp(0.0, 100.0),
        LinePosition::Number(_) | LinePosition::Auto => 100.0,
    };
    let line_percent = if span > 0.0 {
        bbox.line_height / span * 100.0
    } else {
        0.0
    };
    match cue.line_align {
        LineAlign::Start => {}
        LineAlign::Center => percent -= line_percent / 2.0,
        LineAlign::End => percent -= line_percent,
    }

    let fraction = percent / 100.0;
    *bbox = match cue.vertical {
        WritingMode::Horizontal => {
            bbox.with_origin(bbox.left, container.top + fraction * container.height())
        }
        WritingMode::VerticalRl => bbox.with_origin(
            container.right - fraction * container.width() - bbox.width(),
            bbox.top,
        ),
        WritingMode::VerticalLr => {
            bbox.with_origin(container.left + fraction * container.width(), bbox.top)
        }
    };
    trace!("cue '{}' set at {percent}% of the line axis", cue.id);

    SmallVec::from_slice(&[Axis::PlusY, Axis::MinusX, Axis::PlusX, Axis::MinusY])
}

/// Position kept when no axis fits inside the container
#[derive(Debug, Clone, Copy)]
struct BestEffort {
    bbox: LayoutBox,
    score: f64,
    axis: Axis,
}

/// Outcome of searching a set of axes
enum Probe {
    /// Inside the container without overlaps
    Fit(LayoutBox),
    /// Best position that is not fully inside the container
    BestEffort(BestEffort),
    /// Every axis ran out of steps while still overlapping
    Exhausted,
}

/// Collision search against one container and one set of placed boxes
struct Search<'a> {
    container: &'a ContainerBox,
    placed: &'a [LayoutBox],
    max_steps: usize,
}

impl Search<'_> {
    fn run(&self, specified: LayoutBox, axes: &[Axis]) -> LayoutBox {
        let best = match self.probe(specified, axes) {
            Probe::Fit(bbox) => return bbox,
            Probe::BestEffort(best) => best,
            Probe::Exhausted => {
                trace!("search exhausted on every axis, keeping specified position");
                return specified;
            }
        };

        let cross: [Axis; 2] = if best.axis.is_horizontal() {
            [Axis::PlusY, Axis::MinusY]
        } else {
            [Axis::PlusX, Axis::MinusX]
        };
        match self.probe(best.bbox, &cross) {
            Probe::Fit(bbox) => bbox,
            Probe::BestEffort(refined) if refined.score > best.score => {
                trace!(
                    "refinement along {} improved score {} -> {}",
                    refined.axis,
                    best.score,
                    refined.score
                );
                refined.bbox
            }
            Probe::BestEffort(_) | Probe::Exhausted => best.bbox,
        }
    }

    fn probe(&self, start: LayoutBox, axes: &[Axis]) -> Probe {
        let mut best: Option<BestEffort> = None;

        for &axis in axes {
            let limit = self.step_limit(&start, axis);
            let mut bbox = start;
            let mut steps = 0;
            while self.must_move(&bbox, axis) {
                if steps == limit {
                    break;
                }
                bbox.move_along(axis, None);
                steps += 1;
            }

            if bbox.within(self.container) {
                if bbox.overlaps_any(self.placed) {
                    trace!("axis {axis} hit the step limit ({limit}) while overlapping");
                    continue;
                }
                trace!("axis {axis} fits after {steps} steps");
                return Probe::Fit(bbox);
            }

            let score = bbox.intersect_percentage(self.container);
            trace!("axis {axis} ends outside the container, score {score}");
            if !best.is_some_and(|current| current.score >= score) {
                best = Some(BestEffort { bbox, score, axis });
            }
        }

        best.map_or(Probe::Exhausted, Probe::BestEffort)
    }

    fn must_move(&self, bbox: &LayoutBox, axis: Axis) -> bool {
        bbox.overlaps_opposite_axis(self.container, axis)
            || (bbox.within(self.container) && bbox.overlaps_any(self.placed))
    }

    /// Moves needed to carry the box from anywhere in its union with the
    /// container fully past the far side, capped by the configured limit
    fn step_limit(&self, bbox: &LayoutBox, axis: Axis) -> usize {
        let c = self.container;
        let (near, far, low, high) = if axis.is_horizontal() {
            (c.left, c.right, bbox.left, bbox.right)
        } else {
            (c.top, c.bottom, bbox.top, bbox.bottom)
        };
        let reach = far.max(high) - near.min(low) + (high - low);
        let steps = (reach / bbox.line_height).ceil() + 1.0;
        if steps.is_finite() && steps >= 0.0 && steps < self.max_steps as f64 {
            steps as usize
        } else {
            self.max_steps
        }
    }
}
