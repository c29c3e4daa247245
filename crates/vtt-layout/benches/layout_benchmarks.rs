//! Layout pass benchmarks
//!
//! Measures markup parsing, direction detection and full layout passes for
//! growing numbers of simultaneously visible cues, with and without the pass
//! cache.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use vtt_layout::{
    detect_direction, layout_cues, parse, Cue, CueBatchProcessor, LayoutBox, LayoutConfig,
    LinePosition, WritingMode,
};

/// Check if running in quick mode (for CI or quick tests)
fn is_quick_bench() -> bool {
    std::env::var("QUICK_BENCH").is_ok()
}

fn sample_cues(count: usize) -> Vec<Cue> {
    (0..count)
        .map(|i| {
            let text = match i % 4 {
                0 => format!("<v Speaker{i}>Line number {i} with <b>bold</b> text</v>"),
                1 => format!("<c.yellow.bg_black>שלום {i}</c> and <i>mixed</i>"),
                2 => format!("<ruby>漢字<rt>kanji</rt></ruby> {i}"),
                _ => format!("A much longer caption {i} that will need to wrap across more than one line of the overlay"),
            };
            let cue = Cue::new(i.to_string(), 0.0, 5.0, text);
            match i % 5 {
                3 => cue.with_line(LinePosition::Number(0.0)),
                4 => cue.with_vertical(WritingMode::VerticalRl),
                _ => cue,
            }
        })
        .collect()
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");
    let cues = sample_cues(4);

    for cue in &cues {
        group.throughput(Throughput::Bytes(cue.text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", &cue.id), &cue.text, |b, text| {
            b.iter(|| parse(black_box(text)));
        });
    }

    let tree = parse(&cues[1].text);
    group.bench_function("detect_direction", |b| {
        b.iter(|| detect_direction(black_box(&tree)));
    });
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_pass");
    if is_quick_bench() {
        group.sample_size(20);
    }

    let container = LayoutBox::container(1920.0, 1080.0);
    let config = LayoutConfig::default();

    for count in [1, 4, 16, 64] {
        let cues = sample_cues(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("uncached", count), &cues, |b, cues| {
            b.iter(|| layout_cues(black_box(cues), &container, &config));
        });

        group.bench_with_input(BenchmarkId::new("cached", count), &cues, |b, cues| {
            let mut processor = CueBatchProcessor::new(config.clone());
            b.iter(|| processor.layout(black_box(cues), &container));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parsing, bench_layout);
criterion_main!(benches);
