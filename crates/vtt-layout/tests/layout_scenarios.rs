//! End-to-end layout scenarios on a 1280x720 overlay
//!
//! With the default configuration the text line height is 48px (720 / 15)
//! and a regular character advances 24px.

use pretty_assertions::assert_eq;
use vtt_layout::{
    layout_cues, markup::NodeKind, Align, Cue, CueBatchProcessor, CuePosition, Direction,
    ErrorCategory, LayoutBox, LayoutConfig, LayoutError, LineAlign, LinePosition, StringDecoder,
    StyleOverrides, WritingMode,
};

const LINE: f64 = 48.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn container() -> LayoutBox {
    LayoutBox::container(1280.0, 720.0)
}

fn run(cues: &[Cue]) -> Vec<vtt_layout::PlacedCue> {
    init_logging();
    layout_cues(cues, &container(), &LayoutConfig::default())
}

#[test]
fn centered_cue_sits_on_bottom_edge() {
    let cue = Cue::new("1", 0.0, 2.0, "Hello, world")
        .with_line(LinePosition::Number(-1.0))
        .with_size(50.0);
    let placed = run(&[cue]);

    let bbox = placed[0].bbox;
    let (mid_x, _) = bbox.center();
    assert!((mid_x - 640.0).abs() <= 1.0, "midpoint {mid_x}");
    assert_eq!(bbox.bottom, 720.0);
    assert_eq!(placed[0].offsets.bottom, 0.0);
    assert_eq!(placed[0].offsets.left, 320.0);
    assert_eq!(placed[0].offsets.padding_right, 320.0);
}

#[test]
fn second_bottom_cue_stacks_above_first() {
    let cues = [
        Cue::new("1", 0.0, 2.0, "first").with_line(LinePosition::Number(-1.0)),
        Cue::new("2", 0.0, 2.0, "second").with_line(LinePosition::Number(-1.0)),
    ];
    let placed = run(&cues);
    let (first, second) = (placed[0].bbox, placed[1].bbox);

    assert!(!first.overlaps(&second));
    assert!(second.bottom <= first.top);
    assert!(first.top - second.top >= LINE);
}

#[test]
fn many_cues_fill_from_the_bottom_up() {
    let cues: Vec<Cue> = (0..5)
        .map(|i| Cue::new(i.to_string(), 0.0, 1.0, format!("line {i}")))
        .collect();
    let placed = run(&cues);

    for (i, cue) in placed.iter().enumerate() {
        assert_eq!(cue.bbox.bottom, 720.0 - i as f64 * LINE, "cue {i}");
        assert!(cue.bbox.within(&container()));
    }
}

#[test]
fn empty_cue_keeps_zero_box() {
    let placed = run(&[Cue::new("empty", 0.0, 1.0, "")]);
    assert_eq!(placed[0].bbox.width(), 0.0);
    assert_eq!(placed[0].bbox.height(), 0.0);
    assert_eq!(placed[0].line_count, 0);
    assert!(placed[0].tree.is_empty());
}

#[test]
fn empty_cue_does_not_block_others() {
    let cues = [
        Cue::new("empty", 0.0, 1.0, "<b> </b>"),
        Cue::new("text", 0.0, 1.0, "visible"),
    ];
    let placed = run(&cues);
    assert_eq!(placed[1].bbox.bottom, 720.0);
}

#[test]
fn identical_passes_are_identical() {
    init_logging();
    let cues = vec![
        Cue::new("1", 0.0, 1.0, "<c.yellow>one</c>"),
        Cue::new("2", 0.0, 1.0, "two").with_line(LinePosition::Number(3.0)),
        Cue::new("3", 0.0, 1.0, "שלום").with_align(Align::Start),
    ];

    let uncached = layout_cues(&cues, &container(), &LayoutConfig::default());
    assert_eq!(uncached, layout_cues(&cues, &container(), &LayoutConfig::default()));

    let mut processor = CueBatchProcessor::default();
    let first = processor.layout(&cues, &container());
    let second = processor.layout(&cues, &container());
    assert_eq!(first, uncached);
    assert_eq!(first, second);
    assert_eq!(processor.cache_stats().hits, 1);

    let mut fresh = CueBatchProcessor::new(LayoutConfig::default().with_cache(false));
    assert_eq!(fresh.layout(&cues, &container()), uncached);
}

#[test]
fn geometry_change_needs_new_pass() {
    init_logging();
    let cues = [Cue::new("1", 0.0, 1.0, "resize me")];
    let mut processor = CueBatchProcessor::default();

    let small = processor.layout(&cues, &LayoutBox::container(640.0, 360.0));
    let large = processor.layout(&cues, &container());
    assert_eq!(small[0].bbox.bottom, 360.0);
    assert_eq!(large[0].bbox.bottom, 720.0);
    assert_eq!(processor.cache_stats().misses, 2);
}

#[test]
fn rtl_cue_reports_direction_and_anchors_right() {
    let cue = Cue::new("1", 0.0, 1.0, "<v Dana>مرحبا بالعالم</v>")
        .with_align(Align::Start)
        .with_position(CuePosition::Percent(100.0))
        .with_size(40.0);
    let placed = run(&[cue]);

    assert_eq!(placed[0].direction, Direction::Rtl);
    assert_eq!(placed[0].bbox.right, 1280.0);
    assert_eq!(placed[0].offsets.padding_right, 0.0);
}

#[test]
fn placed_cue_carries_parsed_tree() {
    let placed = run(&[Cue::new("1", 0.0, 1.0, "a<00:00:01.000>b")]);
    let tree = &placed[0].tree;
    let kinds: Vec<&NodeKind> = tree
        .children(tree.root())
        .iter()
        .map(|&id| tree.node(id).kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            &NodeKind::Text("a".to_string()),
            &NodeKind::Timestamp(1.0),
            &NodeKind::Text("b".to_string()),
        ]
    );
}

#[test]
fn style_overrides_pass_through() {
    init_logging();
    let mut styles = StyleOverrides::default();
    styles
        .cue_box
        .insert("font-size".to_string(), "32px".to_string());

    let mut processor = CueBatchProcessor::default();
    let placed = processor.layout_with_styles(
        &[Cue::new("1", 0.0, 1.0, "styled")],
        &container(),
        &styles,
    );
    assert_eq!(placed[0].cue_box_style.get("font-size").map(String::as_str), Some("32px"));
    assert!(placed[0].text_box_style.is_empty());

    // a different style set is a different pass
    processor.layout(&[Cue::new("1", 0.0, 1.0, "styled")], &container());
    assert_eq!(processor.cache_stats().misses, 2);
}

#[test]
fn percentage_cue_respects_line_align() {
    let cue = Cue::new("1", 0.0, 1.0, "middle")
        .with_snap_to_lines(false)
        .with_line(LinePosition::Number(50.0))
        .with_line_align(LineAlign::Center);
    let placed = run(&[cue]);
    let (_, mid_y) = placed[0].bbox.center();
    assert!((mid_y - 360.0).abs() < 1e-9, "vertical midpoint {mid_y}");
}

#[test]
fn vertical_cues_stay_inside() {
    let cues = [
        Cue::new("rl", 0.0, 1.0, "縦書き").with_vertical(WritingMode::VerticalRl),
        Cue::new("lr", 0.0, 1.0, "縦書き").with_vertical(WritingMode::VerticalLr),
        Cue::new("rl2", 0.0, 1.0, "もう一つ")
            .with_vertical(WritingMode::VerticalRl)
            .with_line(LinePosition::Number(0.0)),
    ];
    let placed = run(&cues);
    for cue in &placed {
        assert!(cue.bbox.within(&container()), "{} at {:?}", cue.cue.id, cue.bbox);
    }
    assert!(!placed[0].bbox.overlaps(&placed[1].bbox));
    assert!(!placed[1].bbox.overlaps(&placed[2].bbox));
    assert!(!placed[0].bbox.overlaps(&placed[2].bbox));
}

#[test]
fn decoded_bytes_feed_the_parser() {
    let decoder = StringDecoder::stripping_bom();
    let text = decoder.decode(b"\xEF\xBB\xBF<b>bold</b>").unwrap();
    assert_eq!(text, "<b>bold</b>");
    let tree = decoder.parse(b"<i>x</i>").unwrap();
    assert_eq!(tree.text_content(), "x");
}

#[test]
fn error_surface() {
    let err = "up".parse::<Direction>().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
    assert!(err.is_recoverable());

    let err = StringDecoder::new().decode(&[b'o', b'k', 0xFF]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidUtf8 { position: 2, .. }));
    assert!(!err.is_recoverable());

    let err = LayoutConfig::default()
        .with_horizontal_line_slots(f64::NAN)
        .validate()
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(CueBatchProcessor::try_new(LayoutConfig::default().with_max_search_steps(0)).is_err());
}
