//! # vtt-layout
//!
//! Layout engine for WebVTT cues: parses cue markup into a styleable tree,
//! detects paragraph direction, and places every visible cue inside a video
//! overlay so that cues neither overlap each other nor leave the overlay
//! when that can be avoided.
//!
//! ## Features
//!
//! - **Total parsing**: malformed markup degrades to text, never errors
//! - **Arena trees**: cue text as a flat node arena addressed by [`markup::NodeId`]
//! - **Snap-to-line and percentage positioning** for horizontal and vertical cues
//! - **Collision avoidance** with a bounded best-position search
//! - **Pass cache**: identical inputs return the previous pass
//! - **Pluggable metrics**: bring real font metrics through [`layout::TextMeasurer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use vtt_layout::{Cue, CueBatchProcessor, LayoutBox, LayoutConfig, LinePosition};
//!
//! let container = LayoutBox::container(1280.0, 720.0);
//! let cues = vec![
//!     Cue::new("1", 0.0, 4.0, "<v Joe>Hello</v>"),
//!     Cue::new("2", 0.0, 4.0, "<i>World</i>").with_line(LinePosition::Number(0.0)),
//! ];
//!
//! let mut processor = CueBatchProcessor::try_new(LayoutConfig::default())?;
//! for placed in processor.layout(&cues, &container) {
//!     assert!(placed.bbox.within(&container));
//!     println!("{} -> {:?}", placed.cue.id, placed.offsets);
//! }
//! # Ok::<(), vtt_layout::LayoutError>(())
//! ```
//!
//! ## Logging
//!
//! Passes and cache decisions are logged at `debug` through the `log`
//! facade; skipped markup and per-axis search results at `trace`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod bidi;
pub mod config;
pub mod cue;
pub mod decoder;
pub mod geometry;
pub mod layout;
pub mod markup;
pub mod utils;

pub use batch::{layout_cues, CacheStats, CueBatchProcessor, PlacedCue, StyleMap, StyleOverrides};
pub use bidi::{detect_direction, Direction};
pub use config::LayoutConfig;
pub use cue::{Align, Cue, CuePosition, LineAlign, LinePosition, PositionAlign, WritingMode};
pub use decoder::StringDecoder;
pub use geometry::{Axis, ContainerBox, LayoutBox, RelativeOffsets};
pub use markup::{parse, CueTree};
pub use utils::{ErrorCategory, LayoutError};

/// Result type alias for fallible `vtt-layout` operations
pub type Result<T> = core::result::Result<T, LayoutError>;

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
