// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-file analysis: layer detection, then (when text analysis is on) direct
// extraction, the OCR fallback, sentinel normalisation, and search.

use std::path::Path;
use std::sync::Arc;

use layerscope_core::error::LayerscopeError;
use layerscope_core::types::{
    AnalysisResult, FileError, FileOutcome, MIN_TEXT_CHARS, NO_TEXT_SENTINEL, ScanOptions,
};
use layerscope_document::{
    LayerDetector, OcrFallbackExtractor, OcrOutcome, PdfReader, TextExtractor,
};
use tracing::{debug, info, instrument, warn};

use crate::search::SearchEngine;

/// Direct text shorter than this (trimmed) triggers the OCR fallback.
pub const OCR_TRIGGER_CHARS: usize = 50;

/// OCR output must be longer than this to be merged.
pub const MIN_OCR_CHARS: usize = 10;

/// Separates direct text from appended OCR output.
pub const OCR_SECTION_HEADER: &str = "\n\n[OCR Results]\n";

/// Analyses one document at a time. Shared read-only between workers.
pub struct FileAnalyzer {
    options: ScanOptions,
    search: Option<SearchEngine>,
    ocr: Option<Arc<OcrFallbackExtractor>>,
}

impl FileAnalyzer {
    /// `ocr` is the probed pipeline; it is only used when
    /// `options.ocr_enabled` is also set.
    pub fn new(options: ScanOptions, ocr: Option<Arc<OcrFallbackExtractor>>) -> Self {
        let search = options.query.as_ref().map(SearchEngine::new);
        Self {
            options,
            search,
            ocr,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Read and analyse the file at `path`, reported under `relative_path`.
    ///
    /// Only an unreadable file is fatal. Everything that goes wrong after the
    /// bytes are in memory is recorded on the result.
    #[instrument(skip_all, fields(file = relative_path))]
    pub fn analyze(&self, path: &Path, relative_path: &str) -> FileOutcome {
        let data = std::fs::read(path).map_err(|err| {
            warn!(%err, "Cannot read file");
            FileError::new(relative_path, err.to_string())
        })?;
        Ok(self.analyze_bytes(relative_path, &data))
    }

    /// Analyse an in-memory document.
    pub fn analyze_bytes(&self, relative_path: &str, data: &[u8]) -> AnalysisResult {
        let mut result = AnalysisResult::new(relative_path);

        let parsed = PdfReader::from_bytes(data);
        if let Err(err) = &parsed {
            debug!(%err, "Document did not parse; structural tiers skipped");
        }
        result.layer_evidence = LayerDetector::detect(data, parsed.as_ref().ok());

        if !self.options.text_analysis {
            return result;
        }

        let mut text = match &parsed {
            Ok(reader) => TextExtractor::extract(reader),
            Err(err) => TextExtractor::failure_text(err),
        };

        if self.options.ocr_enabled && text.trim().chars().count() < OCR_TRIGGER_CHARS {
            if let Some(ocr) = &self.ocr {
                self.apply_ocr(ocr, data, &mut text, &mut result);
            }
        }

        if text.trim().chars().count() < MIN_TEXT_CHARS {
            text = NO_TEXT_SENTINEL.to_string();
        }

        if text != NO_TEXT_SENTINEL {
            if let Some(search) = &self.search {
                match search.search(&text) {
                    Ok(outcome) => {
                        result.has_search_text = outcome.matched;
                        result.text_matches = outcome.snippets;
                    }
                    Err(LayerscopeError::InvalidPattern(message)) => {
                        result.search_error = Some(format!("Regex error: {}", message));
                    }
                    Err(err) => result.search_error = Some(err.to_string()),
                }
            }
        }

        result.extracted_text = Some(text);
        info!(
            layers = result.has_layers(),
            used_ocr = result.used_ocr,
            matched = result.has_search_text,
            "File analysed"
        );
        result
    }

    /// Merge usable OCR text into `text`. Placeholder outcomes are logged
    /// and leave `text` untouched.
    fn apply_ocr(
        &self,
        ocr: &OcrFallbackExtractor,
        data: &[u8],
        text: &mut String,
        result: &mut AnalysisResult,
    ) {
        match ocr.recognize(data) {
            Ok(OcrOutcome::Text(recognized)) if recognized.chars().count() > MIN_OCR_CHARS => {
                if text.trim().is_empty() {
                    *text = recognized;
                } else {
                    text.push_str(OCR_SECTION_HEADER);
                    text.push_str(&recognized);
                }
                result.used_ocr = true;
            }
            Ok(outcome) => {
                debug!(
                    placeholder = outcome.placeholder().unwrap_or("short OCR text"),
                    "OCR output not merged"
                );
            }
            Err(err) => {
                warn!(%err, "OCR failed");
                result.ocr_error = Some(err.to_string());
            }
        }
    }
}
