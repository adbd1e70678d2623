// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Aggregation of per-file outcomes into run-level partitions and counts.

use layerscope_core::types::{AnalysisResult, FileError, FileOutcome};

/// Every outcome of a run, partitioned by layer status.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    with_layers: Vec<AnalysisResult>,
    without_layers: Vec<AnalysisResult>,
    errors: Vec<FileError>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one outcome.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            Ok(result) if result.has_layers() => self.with_layers.push(result),
            Ok(result) => self.without_layers.push(result),
            Err(error) => self.errors.push(error),
        }
    }

    /// Sort every list by path so the report does not depend on the order
    /// files finished in.
    pub fn finish(mut self) -> Self {
        self.with_layers.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        self.without_layers.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        self.errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        self
    }

    pub fn with_layers(&self) -> &[AnalysisResult] {
        &self.with_layers
    }

    pub fn without_layers(&self) -> &[AnalysisResult] {
        &self.without_layers
    }

    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    /// Every analysed file, layered ones first.
    pub fn analysed(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.with_layers.iter().chain(&self.without_layers)
    }

    // -- Counts ---------------------------------------------------------------

    /// Files analysed without a fatal error.
    pub fn processed(&self) -> usize {
        self.with_layers.len() + self.without_layers.len()
    }

    pub fn layered_count(&self) -> usize {
        self.with_layers.len()
    }

    pub fn unlayered_count(&self) -> usize {
        self.without_layers.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Layered files whose evidence came from the byte heuristic only.
    pub fn heuristic_layered_count(&self) -> usize {
        self.with_layers
            .iter()
            .filter(|result| result.layer_evidence.is_some_and(|evidence| !evidence.is_structural()))
            .count()
    }

    pub fn extractable_text_count(&self) -> usize {
        self.analysed().filter(|result| result.has_extractable_text()).count()
    }

    pub fn ocr_count(&self) -> usize {
        self.analysed().filter(|result| result.used_ocr).count()
    }

    pub fn match_count(&self) -> usize {
        self.analysed().filter(|result| result.has_search_text).count()
    }

    pub fn layered_match_count(&self) -> usize {
        self.with_layers.iter().filter(|result| result.has_search_text).count()
    }

    pub fn unlayered_match_count(&self) -> usize {
        self.without_layers.iter().filter(|result| result.has_search_text).count()
    }

    /// Matches in files whose text came (at least partly) from OCR.
    pub fn ocr_match_count(&self) -> usize {
        self.analysed()
            .filter(|result| result.has_search_text && result.used_ocr)
            .count()
    }

    pub fn image_based_count(&self) -> usize {
        self.analysed().filter(|result| result.is_image_based()).count()
    }

    /// Analysed files whose search or OCR stage failed, sorted by path.
    pub fn stage_errors(&self) -> Vec<&AnalysisResult> {
        let mut failed: Vec<&AnalysisResult> = self
            .analysed()
            .filter(|result| result.search_error.is_some() || result.ocr_error.is_some())
            .collect();
        failed.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        failed
    }

    pub fn search_error_count(&self) -> usize {
        self.analysed().filter(|result| result.search_error.is_some()).count()
    }

    /// Matched files sorted by path.
    pub fn matches(&self) -> Vec<&AnalysisResult> {
        let mut matched: Vec<&AnalysisResult> =
            self.analysed().filter(|result| result.has_search_text).collect();
        matched.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerscope_core::types::{LayerEvidence, NO_TEXT_SENTINEL};

    fn result(path: &str, evidence: Option<LayerEvidence>) -> AnalysisResult {
        AnalysisResult {
            layer_evidence: evidence,
            extracted_text: Some("ordinary extracted text".into()),
            ..AnalysisResult::new(path)
        }
    }

    #[test]
    fn outcomes_are_partitioned() {
        let mut summary = RunSummary::new();
        summary.record(Ok(result("b.pdf", Some(LayerEvidence::PageResources))));
        summary.record(Ok(result("a.pdf", None)));
        summary.record(Err(FileError::new("c.pdf", "permission denied")));

        assert_eq!(summary.layered_count(), 1);
        assert_eq!(summary.unlayered_count(), 1);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.processed(), 2);
    }

    #[test]
    fn finish_sorts_by_path() {
        let mut summary = RunSummary::new();
        for path in ["z.pdf", "m/a.pdf", "b.pdf"] {
            summary.record(Ok(result(path, None)));
        }
        let summary = summary.finish();
        let paths: Vec<&str> = summary
            .without_layers()
            .iter()
            .map(|result| result.file_path.as_str())
            .collect();
        assert_eq!(paths, vec!["b.pdf", "m/a.pdf", "z.pdf"]);
    }

    #[test]
    fn counts_follow_flags() {
        let mut summary = RunSummary::new();
        summary.record(Ok(AnalysisResult {
            has_search_text: true,
            used_ocr: true,
            text_matches: vec!["...hit...".into()],
            ..result("ocr.pdf", Some(LayerEvidence::RawContentHeuristic))
        }));
        summary.record(Ok(AnalysisResult {
            has_search_text: true,
            text_matches: vec!["...hit...".into()],
            ..result("plain.pdf", None)
        }));
        summary.record(Ok(AnalysisResult {
            extracted_text: Some(NO_TEXT_SENTINEL.into()),
            ..result("scan.pdf", None)
        }));
        summary.record(Ok(AnalysisResult::new("layers-only.pdf")));

        assert_eq!(summary.match_count(), 2);
        assert_eq!(summary.layered_match_count(), 1);
        assert_eq!(summary.unlayered_match_count(), 1);
        assert_eq!(summary.ocr_count(), 1);
        assert_eq!(summary.ocr_match_count(), 1);
        assert_eq!(summary.heuristic_layered_count(), 1);
        assert_eq!(summary.extractable_text_count(), 2);
        assert_eq!(summary.image_based_count(), 1);

        let matched: Vec<&str> = summary.matches().iter().map(|r| r.file_path.as_str()).collect();
        assert_eq!(matched, vec!["ocr.pdf", "plain.pdf"]);
        assert!(summary.stage_errors().is_empty());
    }

    #[test]
    fn stage_errors_collect_search_and_ocr_failures() {
        let mut summary = RunSummary::new();
        summary.record(Ok(AnalysisResult {
            ocr_error: Some("OCR processing failed: model missing".into()),
            ..result("z/scan.pdf", Some(LayerEvidence::PageResources))
        }));
        summary.record(Ok(AnalysisResult {
            search_error: Some("Regex error: unclosed group".into()),
            ..result("a/memo.pdf", None)
        }));
        summary.record(Ok(result("m/clean.pdf", None)));

        let failed: Vec<&str> = summary
            .stage_errors()
            .iter()
            .map(|result| result.file_path.as_str())
            .collect();
        assert_eq!(failed, vec!["a/memo.pdf", "z/scan.pdf"]);
        assert_eq!(summary.search_error_count(), 1);
    }
}
