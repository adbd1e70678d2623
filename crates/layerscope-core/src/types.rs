// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Layerscope scanner.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Placeholder stored when a document yields no usable text.
pub const NO_TEXT_SENTINEL: &str = "[No extractable text found - may be image-based PDF]";

/// Prefix of the placeholder produced when direct extraction fails.
pub const EXTRACTION_ERROR_PREFIX: &str = "[Error extracting text";

/// Trimmed text shorter than this is replaced by [`NO_TEXT_SENTINEL`].
pub const MIN_TEXT_CHARS: usize = 10;

/// Maximum number of match snippets kept per document.
pub const MAX_TEXT_MATCHES: usize = 5;

/// Which detection tier established that a document carries layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerEvidence {
    /// The catalog declares `/OCProperties` with a non-empty `/OCGs` array.
    CatalogOcProperties,
    /// A page resource dictionary references marked-content properties or
    /// an optional-content graphics state.
    PageResources,
    /// Optional-content tokens found in the raw file bytes. Lower confidence.
    RawContentHeuristic,
}

impl LayerEvidence {
    /// Whether the evidence came from the parsed object model rather than a
    /// byte scan.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::RawContentHeuristic)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CatalogOcProperties => "catalog /OCProperties",
            Self::PageResources => "page resources",
            Self::RawContentHeuristic => "raw-content heuristic",
        }
    }
}

/// How a search term is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Case-insensitive substring match.
    Literal,
    /// Case-insensitive regular expression.
    Pattern,
}

/// A non-empty search term together with its interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    term: String,
    mode: SearchMode,
}

impl SearchQuery {
    /// Returns `None` for an empty term: an empty search is no search.
    pub fn new(term: impl Into<String>, mode: SearchMode) -> Option<Self> {
        let term = term.into();
        if term.is_empty() {
            None
        } else {
            Some(Self { term, mode })
        }
    }

    pub fn literal(term: impl Into<String>) -> Option<Self> {
        Self::new(term, SearchMode::Literal)
    }

    pub fn pattern(term: impl Into<String>) -> Option<Self> {
        Self::new(term, SearchMode::Pattern)
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

/// What the analyzer does beyond layer detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Run the text stage (extraction, OCR fallback, search).
    pub text_analysis: bool,
    /// Term to look for. Only used when `text_analysis` is set.
    pub query: Option<SearchQuery>,
    /// Allow the OCR fallback. Only used when `text_analysis` is set.
    pub ocr_enabled: bool,
}

/// Per-document analysis outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Path relative to the scanned folder.
    pub file_path: String,
    /// Set when any detection tier was positive.
    pub layer_evidence: Option<LayerEvidence>,
    /// `None` when the text stage did not run.
    pub extracted_text: Option<String>,
    /// OCR produced usable text that was merged into `extracted_text`.
    pub used_ocr: bool,
    pub has_search_text: bool,
    /// At most [`MAX_TEXT_MATCHES`] snippets, in order of discovery.
    pub text_matches: Vec<String>,
    pub ocr_error: Option<String>,
    pub search_error: Option<String>,
}

impl AnalysisResult {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            layer_evidence: None,
            extracted_text: None,
            used_ocr: false,
            has_search_text: false,
            text_matches: Vec::new(),
            ocr_error: None,
            search_error: None,
        }
    }

    pub fn has_layers(&self) -> bool {
        self.layer_evidence.is_some()
    }

    /// Text was extracted and is neither the sentinel nor an extraction
    /// error placeholder.
    pub fn has_extractable_text(&self) -> bool {
        match self.extracted_text.as_deref() {
            Some(text) => {
                !text.is_empty()
                    && text != NO_TEXT_SENTINEL
                    && !text.starts_with(EXTRACTION_ERROR_PREFIX)
            }
            None => false,
        }
    }

    /// The text stage ran and found nothing usable.
    pub fn is_image_based(&self) -> bool {
        self.extracted_text.as_deref() == Some(NO_TEXT_SENTINEL)
    }
}

/// A document whose analysis could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file_path: String,
    pub message: String,
}

impl FileError {
    pub fn new(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            message: message.into(),
        }
    }
}

/// Outcome of analysing one file.
pub type FileOutcome = std::result::Result<AnalysisResult, FileError>;

/// Run-level facts shown in the report header.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub folder: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub duration: Duration,
    pub total_files: usize,
    pub text_analysis: bool,
    pub ocr_available: bool,
    pub ocr_enabled: bool,
    pub query: Option<SearchQuery>,
    /// Name of the PDF library, shown in the scan information block.
    pub pdf_library: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_none() {
        assert!(SearchQuery::literal("").is_none());
        assert!(SearchQuery::pattern("").is_none());
        let query = SearchQuery::literal("secret").unwrap();
        assert_eq!(query.term(), "secret");
        assert_eq!(query.mode(), SearchMode::Literal);
    }

    #[test]
    fn heuristic_evidence_is_not_structural() {
        assert!(LayerEvidence::CatalogOcProperties.is_structural());
        assert!(LayerEvidence::PageResources.is_structural());
        assert!(!LayerEvidence::RawContentHeuristic.is_structural());
    }

    #[test]
    fn extractable_text_excludes_placeholders() {
        let mut result = AnalysisResult::new("a.pdf");
        assert!(!result.has_extractable_text());

        result.extracted_text = Some(NO_TEXT_SENTINEL.to_string());
        assert!(!result.has_extractable_text());
        assert!(result.is_image_based());

        result.extracted_text = Some("[Error extracting text: bad xref]".to_string());
        assert!(!result.has_extractable_text());
        assert!(!result.is_image_based());

        result.extracted_text = Some("Quarterly figures".to_string());
        assert!(result.has_extractable_text());
    }
}
