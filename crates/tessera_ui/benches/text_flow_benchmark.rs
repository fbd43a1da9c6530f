//! # Text Flow Benchmark
//!
//! Measures greedy wrapping of paragraphs of growing length. Tooltips and
//! text panels rewrap whenever their text or size changes.
//!
//! Run with: `cargo bench --package tessera_ui --bench text_flow_benchmark`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_ui::{wrap_text, MonospaceMeasure, Vec2};

const WORDS: [&str; 8] = [
    "registry", "panel", "focus", "modal", "tooltip", "menu", "draw", "order",
];

fn paragraph(words: usize) -> String {
    let mut text = String::with_capacity(words * 8);
    for index in 0..words {
        if index > 0 {
            text.push(if index % 40 == 0 { '\n' } else { ' ' });
        }
        text.push_str(WORDS[index % WORDS.len()]);
    }
    text
}

/// Benchmark: wrap into a narrow, unbounded column.
fn bench_wrap_paragraph(c: &mut Criterion) {
    let measure = MonospaceMeasure::default();
    let mut group = c.benchmark_group("wrap_paragraph");

    for words in [16_usize, 128, 1_024] {
        let text = paragraph(words);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| wrap_text(black_box(text), &measure, 12.0, Vec2::new(240.0, f32::INFINITY)));
        });
    }

    group.finish();
}

/// Benchmark: wrapping stops early once the box is full.
fn bench_wrap_clipped(c: &mut Criterion) {
    let measure = MonospaceMeasure::default();
    let text = paragraph(1_024);

    c.bench_function("wrap_clipped_4_lines", |b| {
        b.iter(|| wrap_text(black_box(&text), &measure, 12.0, Vec2::new(240.0, 48.0)));
    });
}

criterion_group!(benches, bench_wrap_paragraph, bench_wrap_clipped);
criterion_main!(benches);
