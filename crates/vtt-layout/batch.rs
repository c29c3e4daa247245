//! Layout passes over a set of simultaneously visible cues
//!
//! A pass orders cues by their line setting, builds every candidate box,
//! then places the cues one at a time so each placed box becomes an obstacle
//! for the next. [`CueBatchProcessor`] keeps the previous pass and returns it
//! again while cues, container and style overrides are unchanged.
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::{Cue, CueBatchProcessor, LayoutBox, LayoutConfig};
//!
//! let mut processor = CueBatchProcessor::new(LayoutConfig::default());
//! let container = LayoutBox::container(1280.0, 720.0);
//! let cues = vec![
//!     Cue::new("1", 0.0, 2.0, "First speaker"),
//!     Cue::new("2", 0.0, 2.0, "Second speaker"),
//! ];
//!
//! let placed = processor.layout(&cues, &container);
//! assert_eq!(placed.len(), 2);
//! assert!(!placed[0].bbox.overlaps(&placed[1].bbox));
//! assert_eq!(placed[1].bbox.bottom, placed[0].bbox.top);
//! ```

use core::{
    fmt,
    hash::{Hash, Hasher},
};
use std::collections::BTreeMap;

use log::debug;

use crate::{
    bidi::{detect_direction, Direction},
    config::LayoutConfig,
    cue::Cue,
    geometry::{ContainerBox, LayoutBox, RelativeOffsets},
    layout::{place, CandidateBox, CueBoxBuilder, EstimatedMeasurer, TextMeasurer},
    markup::{parse, CueTree},
    utils::create_fingerprint_hasher,
    Result,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Style properties injected by the host, keyed by property name
pub type StyleMap = BTreeMap<String, String>;

/// Host style overrides copied onto every placed cue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleOverrides {
    /// Properties for the outer cue box
    pub cue_box: StyleMap,
    /// Properties for the inner text box
    pub text_box: StyleMap,
}

/// A cue with its final box
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedCue {
    /// The cue as supplied
    pub cue: Cue,
    /// Parsed cue text
    pub tree: CueTree,
    /// Paragraph direction of the text
    pub direction: Direction,
    /// Final box in container coordinates
    pub bbox: LayoutBox,
    /// Final box relative to the container edges
    pub offsets: RelativeOffsets,
    /// Wrapped line count
    pub line_count: usize,
    /// Cue box style overrides
    pub cue_box_style: StyleMap,
    /// Text box style overrides
    pub text_box_style: StyleMap,
}

/// Pass cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Passes answered from the cache
    pub hits: usize,
    /// Passes computed and stored
    pub misses: usize,
}

/// Inputs and output of the last computed pass
struct PassCache {
    fingerprint: u64,
    cues: Vec<Cue>,
    container: ContainerBox,
    styles: StyleOverrides,
    output: Vec<PlacedCue>,
}

impl PassCache {
    /// Fingerprint first, then the inputs themselves
    fn matches(
        &self,
        fingerprint: u64,
        cues: &[Cue],
        container: &ContainerBox,
        styles: &StyleOverrides,
    ) -> bool {
        self.fingerprint == fingerprint
            && self.container == *container
            && self.styles == *styles
            && self.cues == cues
    }
}

/// Stateful layout driver owning the configuration, measurer and pass cache
pub struct CueBatchProcessor {
    config: LayoutConfig,
    measurer: Box<dyn TextMeasurer>,
    cache: Option<PassCache>,
    stats: CacheStats,
}

impl CueBatchProcessor {
    /// Create a processor using the estimated text measurer
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        let measurer = EstimatedMeasurer::from_config(&config);
        Self {
            config,
            measurer: Box::new(measurer),
            cache: None,
            stats: CacheStats::default(),
        }
    }

    /// Create a processor after validating `config`
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`](crate::LayoutError::InvalidConfig)
    /// when the configuration cannot drive a pass.
    pub fn try_new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replace the text measurer
    #[must_use]
    pub fn with_measurer<M: TextMeasurer + 'static>(mut self, measurer: M) -> Self {
        self.measurer = Box::new(measurer);
        self.cache = None;
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration and drop the cached pass
    ///
    /// The text measurer is kept as is.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Cache statistics since creation
    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop the cached pass, e.g. after the host's geometry changed
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("layout cache invalidated");
        }
    }

    /// Lay out `cues` inside `container`
    pub fn layout(&mut self, cues: &[Cue], container: &ContainerBox) -> Vec<PlacedCue> {
        self.layout_with_styles(cues, container, &StyleOverrides::default())
    }

    /// Lay out `cues` inside `container`, attaching `styles` to every result
    pub fn layout_with_styles(
        &mut self,
        cues: &[Cue],
        container: &ContainerBox,
        styles: &StyleOverrides,
    ) -> Vec<PlacedCue> {
        if !self.config.cache_enabled {
            return run_pass(cues, container, styles, &self.config, self.measurer.as_ref());
        }

        let fingerprint = pass_fingerprint(cues, container, styles);
        if let Some(cache) = &self.cache {
            if cache.matches(fingerprint, cues, container, styles) {
                self.stats.hits += 1;
                debug!("layout cache hit for {} cues", cues.len());
                return cache.output.clone();
            }
        }

        self.stats.misses += 1;
        debug!("layout cache miss for {} cues", cues.len());
        let output = run_pass(cues, container, styles, &self.config, self.measurer.as_ref());
        self.cache = Some(PassCache {
            fingerprint,
            cues: cues.to_vec(),
            container: *container,
            styles: styles.clone(),
            output: output.clone(),
        });
        output
    }
}

impl Default for CueBatchProcessor {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for CueBatchProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CueBatchProcessor")
            .field("config", &self.config)
            .field("cached", &self.cache.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Run an uncached pass with the estimated text measurer
///
/// # Example
///
/// ```rust
/// use vtt_layout::{layout_cues, Cue, LayoutBox, LayoutConfig};
///
/// let container = LayoutBox::container(1280.0, 720.0);
/// let placed = layout_cues(&[Cue::new("1", 0.0, 1.0, "Hi")], &container, &LayoutConfig::default());
/// assert_eq!(placed[0].offsets.bottom, 0.0);
/// ```
#[must_use]
pub fn layout_cues(cues: &[Cue], container: &ContainerBox, config: &LayoutConfig) -> Vec<PlacedCue> {
    let measurer = EstimatedMeasurer::from_config(config);
    run_pass(cues, container, &StyleOverrides::default(), config, &measurer)
}

/// Cue ready for placement
struct Prepared<'a> {
    cue: &'a Cue,
    tree: CueTree,
    direction: Direction,
    candidate: CandidateBox,
}

fn run_pass(
    cues: &[Cue],
    container: &ContainerBox,
    styles: &StyleOverrides,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Vec<PlacedCue> {
    let mut ordered: Vec<&Cue> = cues.iter().collect();
    ordered.sort_by(|a, b| a.nominal_line().total_cmp(&b.nominal_line()));

    let builder = CueBoxBuilder::new(config, measurer);
    let prepared: Vec<Prepared<'_>> = ordered
        .into_iter()
        .map(|cue| {
            let tree = parse(&cue.text);
            let direction = detect_direction(&tree);
            let candidate = builder.build(cue, &tree, direction, container);
            Prepared {
                cue,
                tree,
                direction,
                candidate,
            }
        })
        .collect();

    let mut remaining_lines: usize = prepared.iter().map(|p| p.candidate.line_count).sum();
    debug!(
        "layout pass: {} cues, {remaining_lines} lines, container {}x{}",
        prepared.len(),
        container.width(),
        container.height()
    );

    let mut obstacles: Vec<LayoutBox> = Vec::with_capacity(prepared.len());
    let mut output = Vec::with_capacity(prepared.len());
    for Prepared {
        cue,
        tree,
        direction,
        candidate,
    } in prepared
    {
        let bbox = place(
            candidate.bbox,
            cue,
            container,
            &obstacles,
            remaining_lines,
            config,
        );
        remaining_lines = remaining_lines.saturating_sub(candidate.line_count);
        obstacles.push(bbox);

        output.push(PlacedCue {
            cue: cue.clone(),
            tree,
            direction,
            bbox,
            offsets: bbox.to_relative(container),
            line_count: candidate.line_count,
            cue_box_style: styles.cue_box.clone(),
            text_box_style: styles.text_box.clone(),
        });
    }

    output
}

fn pass_fingerprint(cues: &[Cue], container: &ContainerBox, styles: &StyleOverrides) -> u64 {
    let mut hasher = create_fingerprint_hasher();
    cues.hash(&mut hasher);
    container.hash(&mut hasher);
    styles.hash(&mut hasher);
    hasher.finish()
}
