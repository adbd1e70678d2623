// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text run report and per-file status lines.
//
// Rendering is pure: the same summary and metadata always produce the same
// text.

use std::fmt;
use std::time::Duration;

use layerscope_core::types::{AnalysisResult, FileOutcome, RunMetadata, SearchMode};

use crate::summary::RunSummary;

/// Snippets shown per file in the matches section.
const SNIPPETS_SHOWN: usize = 2;

/// `count / total` as a percentage, `0.0` when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// One-line console status for a finished file.
pub fn status_line(outcome: &FileOutcome) -> String {
    match outcome {
        Ok(result) => {
            let mut line = String::from(if result.has_layers() {
                "HAS LAYERS"
            } else {
                "No layers"
            });
            if result.has_search_text {
                line.push_str(" + TEXT FOUND");
            }
            if result.used_ocr {
                line.push_str(" (OCR)");
            }
            line
        }
        Err(error) => format!("ERROR: {}", error.message),
    }
}

/// Render the full report.
pub fn build_report(summary: &RunSummary, metadata: &RunMetadata) -> String {
    Report::new(summary, metadata).to_string()
}

/// The run report; render it with `to_string()` or `{}`.
pub struct Report<'a> {
    summary: &'a RunSummary,
    metadata: &'a RunMetadata,
}

impl<'a> Report<'a> {
    pub fn new(summary: &'a RunSummary, metadata: &'a RunMetadata) -> Self {
        Self { summary, metadata }
    }

    fn searching(&self) -> bool {
        self.metadata.text_analysis && self.metadata.query.is_some()
    }

    fn scan_information(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.metadata;
        writeln!(f, "SCAN INFORMATION:")?;
        writeln!(f, "  Scanned Folder: {}", meta.folder.display())?;
        writeln!(f, "  Scan Date: {}", meta.started_at.format("%Y-%m-%d"))?;
        writeln!(
            f,
            "  Scan Time: {} - {}",
            meta.started_at.format("%H:%M:%S"),
            meta.finished_at.format("%H:%M:%S")
        )?;
        writeln!(f, "  Processing Duration: {}", format_duration(meta.duration))?;
        writeln!(f, "  Total Files Found: {}", meta.total_files)?;
        writeln!(f, "  PDF Library: {}", meta.pdf_library)?;
        writeln!(f, "  Text Analysis Enabled: {}", yes_no(meta.text_analysis))?;
        writeln!(f, "  OCR Available: {}", yes_no(meta.ocr_available))?;
        writeln!(f, "  OCR Enabled: {}", yes_no(meta.ocr_enabled))?;
        if let Some(query) = meta.query.as_ref().filter(|_| meta.text_analysis) {
            writeln!(f, "  Search Term: \"{}\"", query.term())?;
            let mode = match query.mode() {
                SearchMode::Literal => "literal, case-insensitive",
                SearchMode::Pattern => "regular expression, case-insensitive",
            };
            writeln!(f, "  Search Mode: {}", mode)?;
            writeln!(f, "  Search Scope: ALL PDF files (with and without layers)")?;
        }
        writeln!(f)
    }

    fn statistics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let total = self.metadata.total_files;
        let processed = summary.processed();

        writeln!(f, "STATISTICS:")?;
        writeln!(
            f,
            "  Files WITH layers: {} ({:.1}%)",
            summary.layered_count(),
            percentage(summary.layered_count(), total)
        )?;
        if summary.layered_count() > 0 {
            let heuristic = summary.heuristic_layered_count();
            writeln!(
                f,
                "    - Structural evidence: {}",
                summary.layered_count() - heuristic
            )?;
            writeln!(f, "    - Raw-content heuristic only: {}", heuristic)?;
        }
        writeln!(
            f,
            "  Files WITHOUT layers: {} ({:.1}%)",
            summary.unlayered_count(),
            percentage(summary.unlayered_count(), total)
        )?;
        writeln!(
            f,
            "  Files with errors: {} ({:.1}%)",
            summary.error_count(),
            percentage(summary.error_count(), total)
        )?;

        if self.metadata.text_analysis {
            writeln!(
                f,
                "  Files with extractable text: {} ({:.1}%)",
                summary.extractable_text_count(),
                percentage(summary.extractable_text_count(), processed)
            )?;
            if self.metadata.ocr_enabled {
                writeln!(
                    f,
                    "  Files processed with OCR: {} ({:.1}%)",
                    summary.ocr_count(),
                    percentage(summary.ocr_count(), processed)
                )?;
            }
            if self.searching() {
                writeln!(
                    f,
                    "  Files with search matches (ALL): {} ({:.1}%)",
                    summary.match_count(),
                    percentage(summary.match_count(), processed)
                )?;
                writeln!(f, "    - In files WITH layers: {}", summary.layered_match_count())?;
                writeln!(
                    f,
                    "    - In files WITHOUT layers: {}",
                    summary.unlayered_match_count()
                )?;
                if self.metadata.ocr_enabled {
                    writeln!(f, "    - Found via OCR: {}", summary.ocr_match_count())?;
                }
            }
        }
        writeln!(f)
    }

    fn matched_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matched = self.summary.matches();
        if !self.searching() || matched.is_empty() {
            return Ok(());
        }

        writeln!(f, "ALL FILES WITH TEXT MATCHES ({}):", matched.len())?;
        writeln!(f, "{}", "=".repeat(50))?;
        for (index, result) in matched.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", index + 1, result.file_path)?;
            match result.layer_evidence {
                Some(evidence) => {
                    writeln!(f, "       [!] HAS LAYERS - May contain hidden content!")?;
                    if !evidence.is_structural() {
                        writeln!(
                            f,
                            "       (layers inferred from {} only, lower confidence)",
                            evidence.label()
                        )?;
                    }
                }
                None => writeln!(f, "       Regular PDF (no layers)")?,
            }
            if result.used_ocr {
                writeln!(f, "       Text found via OCR (was image-based)")?;
            }
            if !result.text_matches.is_empty() {
                let shown: Vec<&str> = result
                    .text_matches
                    .iter()
                    .take(SNIPPETS_SHOWN)
                    .map(String::as_str)
                    .collect();
                writeln!(f, "       Matches: {}", shown.join(" | "))?;
            }
            write_file_errors(f, result)?;
        }
        writeln!(f)
    }

    fn layered_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layered = self.summary.with_layers();
        if layered.is_empty() {
            return Ok(());
        }

        writeln!(f, "FILES WITH LAYERS - SUMMARY ({}):", layered.len())?;
        writeln!(f, "{}", "-".repeat(50))?;
        for (index, result) in layered.iter().enumerate() {
            let mut line = format!("  {:>3}. {}", index + 1, result.file_path);
            if result.has_search_text {
                line.push_str(" [TEXT MATCH]");
            }
            if result.used_ocr {
                line.push_str(" [OCR]");
            }
            if result.layer_evidence.is_some_and(|evidence| !evidence.is_structural()) {
                line.push_str(" [HEURISTIC]");
            }
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }

    fn ocr_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ocr_count = self.summary.ocr_count();
        if !self.metadata.ocr_enabled || ocr_count == 0 {
            return Ok(());
        }

        writeln!(f, "OCR PROCESSING SUMMARY ({} files):", ocr_count)?;
        writeln!(f, "{}", "-".repeat(50))?;
        let ocr_files = self.summary.analysed().filter(|result| result.used_ocr);
        for (index, result) in ocr_files.enumerate() {
            writeln!(f, "  {:>3}. {}", index + 1, result.file_path)?;
            if result.has_search_text {
                writeln!(f, "       Text matches found via OCR")?;
            }
        }
        writeln!(f)
    }

    fn stage_error_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.summary.stage_errors();
        if failed.is_empty() {
            return Ok(());
        }

        writeln!(f, "FILES WITH STAGE ERRORS ({}):", failed.len())?;
        writeln!(f, "{}", "-".repeat(40))?;
        for (index, result) in failed.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", index + 1, result.file_path)?;
            write_file_errors(f, result)?;
        }
        writeln!(f)
    }

    fn error_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.summary.errors();
        if errors.is_empty() {
            return Ok(());
        }

        writeln!(f, "FILES WITH ERRORS ({}):", errors.len())?;
        writeln!(f, "{}", "-".repeat(40))?;
        for (index, error) in errors.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", index + 1, error.file_path)?;
            writeln!(f, "       Error: {}", error.message)?;
        }
        writeln!(f)
    }

    fn closing_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let meta = self.metadata;

        writeln!(f, "SUMMARY:")?;
        if summary.layered_count() > 0 {
            writeln!(
                f,
                "  [!] Found {} PDF file(s) containing layers",
                summary.layered_count()
            )?;
            writeln!(f, "  [!] These files may contain redacted content that can be unhidden")?;
        } else {
            writeln!(f, "  - No PDF files with layers were found")?;
        }

        if meta.text_analysis {
            if let Some(query) = &meta.query {
                let matches = summary.match_count();
                if matches > 0 {
                    writeln!(f, "  [+] Found search text in {} file(s) across ALL PDFs", matches)?;
                    let layered = summary.layered_match_count();
                    if layered > 0 {
                        writeln!(
                            f,
                            "  [!] {} of these matches are in layered PDFs (potential security risk)",
                            layered
                        )?;
                    }
                    let via_ocr = summary.ocr_match_count();
                    if meta.ocr_enabled && via_ocr > 0 {
                        writeln!(
                            f,
                            "  [+] {} matches found only through OCR (were image-based)",
                            via_ocr
                        )?;
                    }
                } else if summary.search_error_count() > 0 {
                    writeln!(
                        f,
                        "  [x] Search for \"{}\" failed in {} file(s), see FILES WITH STAGE ERRORS",
                        query.term(),
                        summary.search_error_count()
                    )?;
                } else {
                    writeln!(f, "  - No matches found for \"{}\" in any PDF files", query.term())?;
                }
            }

            if meta.ocr_enabled {
                writeln!(
                    f,
                    "  [+] OCR processed {} image-based PDF(s)",
                    summary.ocr_count()
                )?;
            } else if !meta.ocr_available {
                let image_based = summary.image_based_count();
                if image_based > 0 {
                    writeln!(
                        f,
                        "  [!] Found {} image-based PDF(s) - OCR not available",
                        image_based
                    )?;
                    writeln!(
                        f,
                        "  [i] To enable OCR: build with the `ocr` feature, install the PDFium \
                         library, and run `ocrs-cli` once to download the models"
                    )?;
                }
            }
        }

        if summary.error_count() > 0 {
            writeln!(
                f,
                "  [x] {} file(s) could not be processed",
                summary.error_count()
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        writeln!(f, "{}", rule)?;
        writeln!(f, "PDF LAYER DETECTION & TEXT ANALYSIS REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        self.scan_information(f)?;
        self.statistics(f)?;
        self.matched_files(f)?;
        self.layered_files(f)?;
        self.ocr_files(f)?;
        self.stage_error_files(f)?;
        self.error_files(f)?;
        self.closing_summary(f)?;

        writeln!(
            f,
            "Scan completed at {}",
            self.metadata.finished_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        if self.metadata.text_analysis {
            writeln!(
                f,
                "Text analysis performed on ALL {} PDF files",
                self.summary.processed()
            )?;
        }
        if self.metadata.ocr_enabled {
            writeln!(f, "OCR processing enabled for image-based PDFs")?;
        }
        writeln!(f, "{}", rule)
    }
}

fn write_file_errors(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    if let Some(error) = &result.search_error {
        writeln!(f, "       Search error: {}", error)?;
    }
    if let Some(error) = &result.ocr_error {
        writeln!(f, "       OCR error: {}", error)?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// `mm:ss.fff`, minutes not wrapped at the hour.
fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!(
        "{:02}:{:02}.{:03}",
        seconds / 60,
        seconds % 60,
        duration.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use layerscope_core::types::{FileError, LayerEvidence, NO_TEXT_SENTINEL, SearchQuery};
    use std::path::PathBuf;

    fn metadata(query: Option<SearchQuery>, ocr_enabled: bool, ocr_available: bool) -> RunMetadata {
        let started_at = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        RunMetadata {
            folder: PathBuf::from("/data/releases"),
            started_at,
            finished_at: started_at + chrono::Duration::seconds(65),
            duration: Duration::from_millis(65_250),
            total_files: 4,
            text_analysis: true,
            ocr_available,
            ocr_enabled,
            query,
            pdf_library: "lopdf".into(),
        }
    }

    fn sample_summary() -> RunSummary {
        let mut summary = RunSummary::new();
        summary.record(Ok(AnalysisResult {
            layer_evidence: Some(LayerEvidence::CatalogOcProperties),
            extracted_text: Some("memo with the secret word".into()),
            has_search_text: true,
            text_matches: vec!["...one...".into(), "...two...".into(), "...three...".into()],
            ..AnalysisResult::new("b/layered.pdf")
        }));
        summary.record(Ok(AnalysisResult {
            layer_evidence: Some(LayerEvidence::RawContentHeuristic),
            extracted_text: Some(NO_TEXT_SENTINEL.into()),
            ..AnalysisResult::new("c/odd.pdf")
        }));
        summary.record(Ok(AnalysisResult {
            extracted_text: Some("nothing interesting".into()),
            ..AnalysisResult::new("a/plain.pdf")
        }));
        summary.record(Err(FileError::new("d/locked.pdf", "permission denied")));
        summary.finish()
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn status_lines() {
        let layered = AnalysisResult {
            layer_evidence: Some(LayerEvidence::PageResources),
            has_search_text: true,
            used_ocr: true,
            ..AnalysisResult::new("x.pdf")
        };
        assert_eq!(status_line(&Ok(layered)), "HAS LAYERS + TEXT FOUND (OCR)");
        assert_eq!(status_line(&Ok(AnalysisResult::new("y.pdf"))), "No layers");
        assert_eq!(
            status_line(&Err(FileError::new("z.pdf", "unreadable"))),
            "ERROR: unreadable"
        );
    }

    #[test]
    fn sections_appear_in_order() {
        let report = build_report(
            &sample_summary(),
            &metadata(SearchQuery::literal("secret"), false, false),
        );
        let order = [
            "SCAN INFORMATION:",
            "STATISTICS:",
            "ALL FILES WITH TEXT MATCHES (1):",
            "FILES WITH LAYERS - SUMMARY (2):",
            "FILES WITH ERRORS (1):",
            "SUMMARY:",
            "Scan completed at 2026-03-14 09:31:05",
        ];
        let mut cursor = 0;
        for heading in order {
            let found = report[cursor..]
                .find(heading)
                .unwrap_or_else(|| panic!("missing or out of order: {heading}\n{report}"));
            cursor += found + heading.len();
        }
        assert!(!report.contains("OCR PROCESSING SUMMARY"));
    }

    #[test]
    fn statistics_use_one_decimal() {
        let report = build_report(&sample_summary(), &metadata(None, false, true));
        assert!(report.contains("  Files WITH layers: 2 (50.0%)"));
        assert!(report.contains("    - Raw-content heuristic only: 1"));
        assert!(report.contains("  Files with errors: 1 (25.0%)"));
        assert!(report.contains("  Files with extractable text: 2 (66.7%)"));
        assert!(report.contains("  Processing Duration: 01:05.250"));
        assert!(!report.contains("ALL FILES WITH TEXT MATCHES"));
    }

    #[test]
    fn match_entries_show_two_snippets_and_layer_warning() {
        let report = build_report(
            &sample_summary(),
            &metadata(SearchQuery::literal("secret"), false, false),
        );
        assert!(report.contains("    1. b/layered.pdf"));
        assert!(report.contains("[!] HAS LAYERS - May contain hidden content!"));
        assert!(report.contains("Matches: ...one... | ...two..."));
        assert!(!report.contains("...three..."));
        assert!(report.contains("c/odd.pdf [HEURISTIC]"));
        assert!(report.contains("1 of these matches are in layered PDFs"));
    }

    #[test]
    fn image_based_call_out_when_ocr_unavailable() {
        let report = build_report(&sample_summary(), &metadata(None, false, false));
        assert!(report.contains("Found 1 image-based PDF(s) - OCR not available"));

        let report = build_report(&sample_summary(), &metadata(None, false, true));
        assert!(!report.contains("image-based PDF(s) - OCR not available"));
    }

    #[test]
    fn no_match_call_out_names_the_term() {
        let report = build_report(
            &RunSummary::new(),
            &metadata(SearchQuery::literal("absent"), true, true),
        );
        assert!(report.contains("No matches found for \"absent\" in any PDF files"));
        assert!(report.contains("No PDF files with layers were found"));
        assert!(report.contains("OCR processed 0 image-based PDF(s)"));
    }

    #[test]
    fn invalid_pattern_is_reported_not_hidden() {
        let mut summary = RunSummary::new();
        summary.record(Ok(AnalysisResult {
            extracted_text: Some("An ordinary memo".into()),
            search_error: Some("Regex error: regex parse error: unclosed group".into()),
            ..AnalysisResult::new("memo.pdf")
        }));
        let summary = summary.finish();
        let report = build_report(&summary, &metadata(SearchQuery::pattern("(unclosed"), false, true));

        assert!(report.contains("FILES WITH STAGE ERRORS (1):"));
        assert!(report.contains("       Search error: Regex error: regex parse error"));
        assert!(report.contains("Search for \"(unclosed\" failed in 1 file(s)"));
        assert!(!report.contains("No matches found"));
    }

    #[test]
    fn ocr_failure_without_match_is_listed() {
        let mut summary = RunSummary::new();
        summary.record(Ok(AnalysisResult {
            extracted_text: Some(NO_TEXT_SENTINEL.into()),
            ocr_error: Some("OCR processing failed: engine crashed".into()),
            ..AnalysisResult::new("scan.pdf")
        }));
        let report = build_report(&summary.finish(), &metadata(None, true, true));

        assert!(report.contains("FILES WITH STAGE ERRORS (1):"));
        assert!(report.contains("       OCR error: OCR processing failed: engine crashed"));
        assert!(!report.contains("OCR PROCESSING SUMMARY"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let summary = sample_summary();
        let meta = metadata(SearchQuery::pattern("s.cret"), true, true);
        assert_eq!(build_report(&summary, &meta), build_report(&summary, &meta));
    }
}
