// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Layerscope.

use thiserror::Error;

/// Top-level error type for all Layerscope operations.
#[derive(Debug, Error)]
pub enum LayerscopeError {
    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("{0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    // -- Search errors --
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    // -- Run orchestration --
    #[error("analysis worker failed: {0}")]
    Worker(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LayerscopeError>;
