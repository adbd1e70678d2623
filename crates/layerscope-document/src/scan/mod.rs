// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: page rasterisation and optical character recognition
// for documents without a usable text layer.

pub mod fallback;

#[cfg(feature = "ocr")]
pub mod ocr;
#[cfg(feature = "ocr")]
pub mod render;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fakes;

pub use fallback::{OcrFallbackExtractor, OcrOutcome, PageRasterizer, TextRecognizer};

use layerscope_core::config::ScanConfig;
use layerscope_core::error::Result;

/// Build the production OCR pipeline, or explain why it cannot run here.
///
/// Called once at startup; a failure means the run proceeds with OCR
/// reported as unavailable.
#[cfg(feature = "ocr")]
pub fn probe_pipeline(config: &ScanConfig) -> Result<OcrFallbackExtractor> {
    let rasterizer = render::PdfiumRasterizer::new(config.pdfium_library_dir.as_deref())?;
    let engine = ocr::OcrEngine::new(ocr::OcrConfig::from_scan_config(config))?;
    Ok(OcrFallbackExtractor::new(Box::new(rasterizer), Box::new(engine)).with_dpi(config.render_dpi))
}

/// Build the production OCR pipeline, or explain why it cannot run here.
#[cfg(not(feature = "ocr"))]
pub fn probe_pipeline(_config: &ScanConfig) -> Result<OcrFallbackExtractor> {
    Err(layerscope_core::error::LayerscopeError::OcrUnavailable(
        "built without the `ocr` feature".to_string(),
    ))
}
