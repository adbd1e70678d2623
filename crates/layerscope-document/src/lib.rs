// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// layerscope-document: per-document inspection for Layerscope.
//
// Parses PDFs with lopdf, detects optional-content layers, extracts the text
// layer, and (with the `ocr` feature) rasterises pages for OCR.

pub mod pdf;
pub mod scan;

pub use pdf::layers::LayerDetector;
pub use pdf::reader::PdfReader;
pub use pdf::text::TextExtractor;
pub use scan::fallback::{OcrFallbackExtractor, OcrOutcome};
pub use scan::probe_pipeline;
