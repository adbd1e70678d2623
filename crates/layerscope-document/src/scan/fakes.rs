// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory rasteriser and recogniser for exercising the OCR fallback without
// PDFium or model files.

use std::sync::Mutex;

use image::{DynamicImage, GrayImage, Luma};
use layerscope_core::error::{LayerscopeError, Result};

use super::fallback::{PageRasterizer, RenderedPage, TextRecognizer};

/// Emits `pages` blank images, or fails once `fail_after` pages were emitted.
pub struct FakeRasterizer {
    pub pages: u32,
    pub fail_after: Option<u32>,
}

impl PageRasterizer for FakeRasterizer {
    fn render_pages(
        &self,
        _data: &[u8],
        _dpi: f32,
        sink: &mut dyn FnMut(RenderedPage) -> Result<()>,
    ) -> Result<()> {
        for number in 1..=self.pages {
            if self.fail_after.is_some_and(|limit| number > limit) {
                return Err(LayerscopeError::Render(format!("page {number} corrupt")));
            }
            sink(RenderedPage {
                number,
                image: DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([255]))),
            })?;
        }
        Ok(())
    }
}

/// Returns queued responses in order, then empty strings.
pub struct ScriptedRecognizer {
    responses: Mutex<Vec<Result<String>>>,
}

impl ScriptedRecognizer {
    pub fn new(mut responses: Vec<Result<String>>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }

    /// Every page reads as `text`.
    pub fn always(text: &str, pages: usize) -> Self {
        Self::new((0..pages).map(|_| Ok(text.to_string())).collect())
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        match self.responses.lock() {
            Ok(mut responses) => responses.pop().unwrap_or_else(|| Ok(String::new())),
            Err(_) => Err(LayerscopeError::Ocr("scripted recognizer poisoned".into())),
        }
    }
}

/// Panics on the first page, standing in for a crashing native engine.
pub struct PanickingRecognizer;

impl TextRecognizer for PanickingRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        panic!("recognition engine crashed")
    }
}
