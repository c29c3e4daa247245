//! Cue box layout: candidate construction and collision-free placement
//!
//! Layout runs in two steps per cue. [`CueBoxBuilder`] derives the candidate
//! box from the cue settings and wrapped text, then [`place`] moves it to its
//! line and away from cues already placed in the same pass.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::{
//!     bidi::detect_direction,
//!     layout::{place, CueBoxBuilder, EstimatedMeasurer},
//!     markup::parse,
//!     Cue, LayoutBox, LayoutConfig,
//! };
//!
//! let config = LayoutConfig::default();
//! let measurer = EstimatedMeasurer::from_config(&config);
//! let container = LayoutBox::container(1280.0, 720.0);
//!
//! let cue = Cue::new("1", 0.0, 2.0, "Hello <b>there</b>");
//! let tree = parse(&cue.text);
//! let candidate = CueBoxBuilder::new(&config, &measurer)
//!     .build(&cue, &tree, detect_direction(&tree), &container);
//!
//! let bbox = place(candidate.bbox, &cue, &container, &[], candidate.line_count, &config);
//! assert!(bbox.within(&container));
//! assert_eq!(bbox.bottom, 720.0);
//! ```

pub mod builder;
pub mod positioning;

pub use builder::{wrap_text, CandidateBox, CueBoxBuilder, EstimatedMeasurer, TextMeasurer};
pub use positioning::place;
