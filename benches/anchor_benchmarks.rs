//! Benchmarks for anchor location and positional extraction on large pages.
//!
//! Run with: `cargo bench --bench anchor_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use field_oxide::extractors::{AnchorLocator, Direction, PositionExtractor, PositionQuery};
use field_oxide::geometry::Quad;
use field_oxide::ocr::{BreakType, OcrDocument, Page, Word};
use field_oxide::template::StringType;

const FILLER: [&str; 8] =
    ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit"];

/// A page of `word_count` filler words laid out in 12-word lines, with
/// `Total Due 1,204.50` as the last line.
fn synthetic_page(word_count: usize) -> OcrDocument {
    let mut words = Vec::with_capacity(word_count + 3);
    for i in 0..word_count {
        let (line, col) = (i / 12, i % 12);
        let x0 = col as f32 * 90.0;
        let y0 = line as f32 * 30.0;
        let brk = if col == 11 { BreakType::LineBreak } else { BreakType::Space };
        words.push(Word::from_text(
            FILLER[i % FILLER.len()],
            Quad::from_points(x0, y0, x0 + 80.0, y0 + 20.0),
            Some(brk),
        ));
    }

    let y0 = (word_count / 12 + 1) as f32 * 30.0;
    let space = Some(BreakType::Space);
    words.push(Word::from_text("Total", Quad::from_points(0.0, y0, 50.0, y0 + 20.0), space));
    words.push(Word::from_text("Due", Quad::from_points(60.0, y0, 90.0, y0 + 20.0), space));
    words.push(Word::from_text(
        "1,204.50",
        Quad::from_points(100.0, y0, 180.0, y0 + 20.0),
        Some(BreakType::LineBreak),
    ));

    OcrDocument::from_pages("bench.pdf", vec![Page::new(words)], vec![None])
}

fn bench_find_anchor(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_anchor");

    for word_count in [100, 1_000, 10_000] {
        let doc = synthetic_page(word_count);
        group.throughput(Throughput::Elements(word_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(word_count), &doc, |b, doc| {
            let locator = AnchorLocator::new(doc);
            b.iter(|| locator.find(black_box("Total Due")));
        });
    }

    group.finish();
}

fn bench_missing_anchor(c: &mut Criterion) {
    let doc = synthetic_page(10_000);
    let locator = AnchorLocator::new(&doc);
    c.bench_function("missing_anchor_10k", |b| {
        b.iter(|| locator.find(black_box("Invoice Number")))
    });
}

fn bench_rightward_extract(c: &mut Criterion) {
    let doc = synthetic_page(1_000);
    let extractor = PositionExtractor::new(&doc);
    let query = PositionQuery::new("Total Due", Direction::Rightward)
        .with_string_type(StringType::Phrase);
    c.bench_function("rightward_extract_1k", |b| b.iter(|| extractor.extract(black_box(&query))));
}

criterion_group!(benches, bench_find_anchor, bench_missing_anchor, bench_rightward_extract);
criterion_main!(benches);
