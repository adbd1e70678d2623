// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use layerscope_core::types::{ScanOptions, SearchMode, SearchQuery};

#[derive(Parser, Debug)]
#[command(
    name = "layerscope",
    version,
    about = "Scan a folder of PDFs for optional-content layers and search their text"
)]
pub struct Cli {
    /// Folder to scan recursively for `.pdf` files.
    pub folder: PathBuf,

    /// Search every document's text for this term (case-insensitive).
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Treat the search term as a regular expression.
    #[arg(long, requires = "search")]
    pub regex: bool,

    /// Extract text even without a search term.
    #[arg(long)]
    pub extract_text: bool,

    /// OCR documents whose text layer is missing or very short.
    #[arg(long)]
    pub ocr: bool,

    /// Number of documents analysed concurrently (overrides the config file).
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to this file.
    #[arg(long, short = 'o', value_name = "FILE", conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Save the report as PDF_Analysis_<folder>_<timestamp>.txt in the
    /// working directory.
    #[arg(long)]
    pub save: bool,
}

impl Cli {
    /// The search, if a non-empty term was given.
    pub fn query(&self) -> Option<SearchQuery> {
        let mode = if self.regex {
            SearchMode::Pattern
        } else {
            SearchMode::Literal
        };
        self.search
            .as_ref()
            .and_then(|term| SearchQuery::new(term.as_str(), mode))
    }

    /// Searching and OCR both imply the text stage.
    pub fn scan_options(&self) -> ScanOptions {
        let query = self.query();
        ScanOptions {
            text_analysis: self.extract_text || self.ocr || query.is_some(),
            query,
            ocr_enabled: self.ocr,
        }
    }
}
