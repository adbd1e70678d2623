// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR fallback: rasterise every page and run text recognition on it, for
// documents whose text layer is missing or too thin to search.
//
// Rendering and recognition sit behind two traits so the pipeline can be
// driven by PDFium + ocrs in production and by in-memory fakes in tests.

use image::DynamicImage;
use layerscope_core::config::DEFAULT_RENDER_DPI;
use layerscope_core::error::{LayerscopeError, Result};
use tracing::{debug, info, instrument, warn};

/// Placeholder for a document whose pages could not be rendered.
pub const OCR_RENDER_FAILED: &str = "OCR processing attempted but failed for this PDF";

/// Placeholder for a document that rendered but yielded no text.
pub const OCR_NO_TEXT: &str = "No text found via OCR";

/// A rasterised page handed to the recogniser.
pub struct RenderedPage {
    /// 1-indexed page number.
    pub number: u32,
    pub image: DynamicImage,
}

/// Turns PDF pages into raster images.
pub trait PageRasterizer: Send + Sync {
    /// Render every page of `data` at `dpi`, passing each to `sink` in page
    /// order. An error returned by `sink` stops rendering and is returned
    /// unchanged.
    fn render_pages(
        &self,
        data: &[u8],
        dpi: f32,
        sink: &mut dyn FnMut(RenderedPage) -> Result<()>,
    ) -> Result<()>;
}

/// Converts a page image into text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// What an OCR pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Recognised text, trimmed, each page introduced by `[Page N]`.
    Text(String),
    /// Pages rendered but nothing was recognised.
    NoText,
    /// The rendering pipeline failed; carries the cause.
    RenderFailed(String),
}

impl OcrOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The fixed message reported in place of text for non-text outcomes.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Text(_) => None,
            Self::NoText => Some(OCR_NO_TEXT),
            Self::RenderFailed(_) => Some(OCR_RENDER_FAILED),
        }
    }
}

/// Renders pages and recognises their text.
pub struct OcrFallbackExtractor {
    rasterizer: Box<dyn PageRasterizer>,
    recognizer: Box<dyn TextRecognizer>,
    dpi: f32,
}

impl OcrFallbackExtractor {
    pub fn new(rasterizer: Box<dyn PageRasterizer>, recognizer: Box<dyn TextRecognizer>) -> Self {
        Self {
            rasterizer,
            recognizer,
            dpi: DEFAULT_RENDER_DPI,
        }
    }

    /// Override the rasterisation resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// OCR every page of `data`.
    ///
    /// Rendering failures are absorbed into [`OcrOutcome::RenderFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`LayerscopeError::Ocr`] when the recognition engine itself
    /// fails; the caller records it as the document's OCR error.
    #[instrument(skip_all, fields(bytes_len = data.len(), dpi = self.dpi))]
    pub fn recognize(&self, data: &[u8]) -> Result<OcrOutcome> {
        let mut collected = String::new();
        let mut engine_failure: Option<LayerscopeError> = None;

        let rendered = self.rasterizer.render_pages(data, self.dpi, &mut |page| {
            match self.recognizer.recognize(&page.image) {
                Ok(text) => {
                    let text = text.trim();
                    debug!(page = page.number, chars = text.len(), "Page recognised");
                    if !text.is_empty() {
                        collected.push_str(&format!("[Page {}]\n{}\n\n", page.number, text));
                    }
                    Ok(())
                }
                Err(err) => {
                    let message = err.to_string();
                    engine_failure = Some(err);
                    Err(LayerscopeError::Ocr(message))
                }
            }
        });

        if let Some(err) = engine_failure {
            return Err(LayerscopeError::Ocr(format!("OCR processing failed: {}", err)));
        }

        if let Err(err) = rendered {
            warn!(%err, "Page rendering failed");
            return Ok(OcrOutcome::RenderFailed(err.to_string()));
        }

        let text = collected.trim();
        if text.is_empty() {
            info!("OCR found no text");
            Ok(OcrOutcome::NoText)
        } else {
            info!(chars = text.chars().count(), "OCR produced text");
            Ok(OcrOutcome::Text(text.to_string()))
        }
    }
}
