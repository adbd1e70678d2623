// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Direct text extraction from the PDF content streams.

use std::fmt::Display;

use layerscope_core::error::LayerscopeError;
use layerscope_core::types::EXTRACTION_ERROR_PREFIX;
use tracing::{debug, instrument, warn};

use super::reader::PdfReader;

/// Pulls the text layer out of every page.
pub struct TextExtractor;

impl TextExtractor {
    /// Concatenate the text of every page, one page per line block, trimmed.
    ///
    /// Never fails: an extraction error is returned as a bracketed
    /// description so one bad document cannot abort a scan.
    #[instrument(skip_all, fields(pages = reader.page_count()))]
    pub fn extract(reader: &PdfReader) -> String {
        match Self::try_extract(reader) {
            Ok(text) => {
                debug!(chars = text.chars().count(), "Text extracted");
                text
            }
            Err(err) => {
                warn!(%err, "Text extraction failed");
                Self::failure_text(&err)
            }
        }
    }

    /// Placeholder recorded in place of text when extraction is impossible.
    pub fn failure_text(err: &impl Display) -> String {
        format!("{}: {}]", EXTRACTION_ERROR_PREFIX, err)
    }

    fn try_extract(reader: &PdfReader) -> Result<String, LayerscopeError> {
        let mut text = String::new();
        for page_number in reader.pages().into_keys() {
            let page_text = reader.page_text(page_number)?;
            if !page_text.trim().is_empty() {
                text.push_str(&page_text);
                text.push('\n');
            }
        }
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{FixtureBuilder, FixturePage, blank_pdf, plain_pdf};

    #[test]
    fn extracts_single_page() {
        let reader = PdfReader::from_bytes(&plain_pdf("Hello Layerscope")).unwrap();
        let text = TextExtractor::extract(&reader);
        assert!(text.contains("Hello Layerscope"), "got {text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn pages_joined_in_order() {
        let data = FixtureBuilder::new()
            .page(FixturePage::text("First page"))
            .page(FixturePage::blank())
            .page(FixturePage::text("Third page"))
            .build();
        let reader = PdfReader::from_bytes(&data).unwrap();
        let text = TextExtractor::extract(&reader);

        let first = text.find("First page").expect("first page text");
        let third = text.find("Third page").expect("third page text");
        assert!(first < third);
        assert!(text[first..third].contains('\n'));
    }

    #[test]
    fn blank_document_yields_empty_text() {
        let reader = PdfReader::from_bytes(&blank_pdf()).unwrap();
        assert_eq!(TextExtractor::extract(&reader), "");
    }

    #[test]
    fn failure_text_is_bracketed() {
        let err = LayerscopeError::Pdf("broken xref".into());
        let text = TextExtractor::failure_text(&err);
        assert!(text.starts_with(EXTRACTION_ERROR_PREFIX));
        assert!(text.ends_with(']'));
        assert!(text.contains("broken xref"));
    }
}
