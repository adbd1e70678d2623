// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for layer detection and text extraction on synthetic
// documents.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use layerscope_document::pdf::fixtures::{FixtureBuilder, FixturePage};
use layerscope_document::{LayerDetector, PdfReader, TextExtractor};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Twenty text pages, no optional content. Every tier runs and none fires,
/// which is the worst case for detection.
fn plain_document() -> Vec<u8> {
    (0..20)
        .fold(FixtureBuilder::new(), |builder, index| {
            builder.page(FixturePage::text(format!("Page {index} body text")))
        })
        .build()
}

/// The same document with a layer referenced from the last page.
fn layered_document() -> Vec<u8> {
    (0..20)
        .fold(FixtureBuilder::new(), |builder, index| {
            builder.page(FixturePage {
                marked_content_properties: index == 19,
                ..FixturePage::text(format!("Page {index} body text"))
            })
        })
        .build()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_detection(c: &mut Criterion) {
    let plain = plain_document();
    let layered = layered_document();
    let plain_reader = PdfReader::from_bytes(&plain).ok();
    let layered_reader = PdfReader::from_bytes(&layered).ok();

    c.bench_function("detect_layers (20 pages, none)", |b| {
        b.iter(|| LayerDetector::detect(black_box(&plain), plain_reader.as_ref()));
    });
    c.bench_function("detect_layers (20 pages, resources)", |b| {
        b.iter(|| LayerDetector::detect(black_box(&layered), layered_reader.as_ref()));
    });
    c.bench_function("detect_layers (unparsed)", |b| {
        b.iter(|| LayerDetector::detect(black_box(&plain), None));
    });
}

fn bench_extraction(c: &mut Criterion) {
    let plain = plain_document();

    c.bench_function("parse_and_extract (20 pages)", |b| {
        b.iter(|| {
            if let Ok(reader) = PdfReader::from_bytes(black_box(&plain)) {
                black_box(TextExtractor::extract(&reader));
            }
        });
    });
}

criterion_group!(benches, bench_detection, bench_extraction);
criterion_main!(benches);
