// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan orchestration: discover PDFs, analyse them on a bounded pool of
// blocking workers, and fold the outcomes into a summary.
//
// Every file is analysed by exactly one task that owns it end to end.
// Outcomes are collected in discovery order by this task alone and the
// summary is sorted afterwards, so the report does not depend on which
// worker finished first.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use layerscope_core::error::{LayerscopeError, Result};
use layerscope_core::types::{FileError, FileOutcome, RunMetadata, ScanOptions};
use layerscope_document::OcrFallbackExtractor;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::analyzer::FileAnalyzer;
use crate::discovery::discover_pdfs;
use crate::report::build_report;
use crate::summary::RunSummary;

/// A completed run.
#[derive(Debug, Clone)]
pub struct ScanRun {
    pub summary: RunSummary,
    pub metadata: RunMetadata,
}

impl ScanRun {
    pub fn report(&self) -> String {
        build_report(&self.summary, &self.metadata)
    }
}

/// Runs one scan over a folder.
pub struct Scanner {
    analyzer: Arc<FileAnalyzer>,
    workers: usize,
    ocr_available: bool,
}

impl Scanner {
    /// `ocr` is the probed OCR pipeline, `None` when unavailable. `workers`
    /// is clamped to at least one.
    pub fn new(options: ScanOptions, ocr: Option<OcrFallbackExtractor>, workers: usize) -> Self {
        let ocr_available = ocr.is_some();
        Self {
            analyzer: Arc::new(FileAnalyzer::new(options, ocr.map(Arc::new))),
            workers: workers.max(1),
            ocr_available,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scan `folder`. `on_file` sees each outcome, in discovery order, as
    /// soon as it and every earlier file are done.
    ///
    /// # Errors
    ///
    /// Fails only when `folder` cannot be listed; per-file failures are
    /// recorded in the summary.
    #[instrument(skip_all, fields(folder = %folder.display(), workers = self.workers))]
    pub async fn run(
        &self,
        folder: &Path,
        mut on_file: impl FnMut(&str, &FileOutcome),
    ) -> Result<ScanRun> {
        let started_at = Local::now();
        let clock = Instant::now();

        let files = discover_pdfs(folder)?;
        let total_files = files.len();
        info!(total_files, "Starting scan");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(total_files);
        for file in files {
            let semaphore = Arc::clone(&semaphore);
            let analyzer = Arc::clone(&self.analyzer);
            let relative_path = file.relative_path.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|err| LayerscopeError::Worker(err.to_string()))?;
                tokio::task::spawn_blocking(move || {
                    analyzer.analyze(&file.path, &file.relative_path)
                })
                .await
                .map_err(|err| LayerscopeError::Worker(err.to_string()))
            });
            handles.push((relative_path, handle));
        }

        let mut summary = RunSummary::new();
        for (relative_path, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    warn!(file = %relative_path, %err, "Analysis task failed");
                    Err(FileError::new(&relative_path, err.to_string()))
                }
                Err(err) => {
                    warn!(file = %relative_path, %err, "Analysis task failed");
                    Err(FileError::new(
                        &relative_path,
                        LayerscopeError::Worker(err.to_string()).to_string(),
                    ))
                }
            };
            on_file(&relative_path, &outcome);
            summary.record(outcome);
        }
        let summary = summary.finish();

        let options = self.analyzer.options();
        let metadata = RunMetadata {
            folder: folder.to_path_buf(),
            started_at,
            finished_at: Local::now(),
            duration: clock.elapsed(),
            total_files,
            text_analysis: options.text_analysis,
            ocr_available: self.ocr_available,
            ocr_enabled: options.text_analysis && options.ocr_enabled && self.ocr_available,
            query: options.query.clone(),
            pdf_library: pdf_library_label(self.ocr_available).to_string(),
        };

        info!(
            processed = summary.processed(),
            layered = summary.layered_count(),
            errors = summary.error_count(),
            "Scan complete"
        );
        Ok(ScanRun { summary, metadata })
    }
}

fn pdf_library_label(ocr_available: bool) -> &'static str {
    if ocr_available {
        "lopdf (structure and text), PDFium (rendering), ocrs (recognition)"
    } else {
        "lopdf (structure and text)"
    }
}
