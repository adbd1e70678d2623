// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layerscope: batch PDF layer detector with text search and OCR fallback.
//
// Entry point. Initialises logging, loads the config, probes the OCR
// pipeline, runs the scan, and prints (optionally saves) the report.
// Logs go to stderr; stdout carries status lines and the report.

mod cli;
mod persist;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use layerscope_core::ScanConfig;
use layerscope_core::error::Result;
use layerscope_document::OcrFallbackExtractor;
use layerscope_scan::{Scanner, status_line};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Layerscope starting");

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(%err, "Scan aborted");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<ExitCode> {
    if !args.folder.is_dir() {
        eprintln!("Invalid folder path. Please provide a valid directory.");
        return Ok(ExitCode::FAILURE);
    }

    let config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::load_default()?,
    };
    let workers = args.jobs.unwrap_or(config.workers);
    let options = args.scan_options();

    println!("PDF Layer Detector: layer detection, text search and OCR over PDF folders");
    println!();

    let ocr = probe_ocr(&config);
    if options.ocr_enabled {
        if ocr.is_some() {
            println!("OCR enabled - will process image-based PDFs");
        } else {
            println!("OCR not available - will use direct text extraction only");
            println!(
                "To enable OCR: build with the `ocr` feature, install the PDFium library, \
                 and run `ocrs-cli` once to download the models"
            );
        }
    }

    println!("\nScanning folder: {}", args.folder.display());
    if let Some(query) = &options.query {
        println!("Searching for: \"{}\" in ALL PDF files", query.term());
    }
    println!("{}", "-".repeat(50));

    let scanner = Scanner::new(options, ocr, workers);
    let scan = scanner
        .run(&args.folder, |path, outcome| {
            println!("Checking: {}... {}", path, status_line(outcome));
        })
        .await?;

    if scan.metadata.total_files == 0 {
        println!("No PDF files found in the specified directory.");
        return Ok(ExitCode::SUCCESS);
    }

    let report = scan.report();
    println!();
    println!("{report}");

    let destination = match (&args.output, args.save) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(persist::report_file_name(
            &args.folder,
            Local::now(),
        ))),
        (None, false) => None,
    };
    if let Some(path) = destination {
        match persist::write_report(&path, &report) {
            Ok(saved) => println!("Report saved to: {}", saved.display()),
            Err(err) => {
                tracing::error!(%err, path = %path.display(), "Failed to save report");
                eprintln!("Error saving report: {err}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Build the OCR pipeline once; `None` when models or PDFium are missing.
fn probe_ocr(config: &ScanConfig) -> Option<OcrFallbackExtractor> {
    match layerscope_document::probe_pipeline(config) {
        Ok(pipeline) => {
            tracing::info!(dpi = pipeline.dpi(), "OCR available");
            Some(pipeline)
        }
        Err(err) => {
            tracing::info!(%err, "OCR unavailable");
            None
        }
    }
}
