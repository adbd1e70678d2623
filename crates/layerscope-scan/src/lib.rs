// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// layerscope-scan: the scan pipeline built on layerscope-document.
//
// Discovers PDFs, analyses each one (layers, text, OCR fallback, search),
// aggregates the outcomes, and renders the run report.

pub mod analyzer;
pub mod discovery;
pub mod report;
pub mod runner;
pub mod search;
pub mod summary;

pub use analyzer::FileAnalyzer;
pub use report::{Report, build_report, percentage, status_line};
pub use runner::{ScanRun, Scanner};
pub use search::{SearchEngine, SearchOutcome};
pub use summary::RunSummary;
