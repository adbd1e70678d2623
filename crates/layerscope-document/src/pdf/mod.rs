// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: parsing, layer detection, and direct text extraction.

pub mod layers;
pub mod reader;
pub mod text;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use layers::LayerDetector;
pub use reader::PdfReader;
pub use text::TextExtractor;
