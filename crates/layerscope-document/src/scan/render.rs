// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterisation through PDFium.
//
// The PDFium shared library is bound once when the rasteriser is built. The
// `thread_safe` feature of `pdfium-render` serialises calls into the library,
// so one rasteriser can be shared by every worker.

use std::path::{Path, PathBuf};

use layerscope_core::error::{LayerscopeError, Result};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use super::fallback::{PageRasterizer, RenderedPage};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind the PDFium library from `library_dir` if given, otherwise from
    /// the working directory and then the system library path.
    ///
    /// # Errors
    ///
    /// [`LayerscopeError::OcrUnavailable`] when no PDFium library can be bound.
    #[instrument(skip_all, fields(library_dir = ?library_dir))]
    pub fn new(library_dir: Option<&Path>) -> Result<Self> {
        let bindings = bind(library_dir).map_err(|err| {
            LayerscopeError::OcrUnavailable(format!("PDFium library not found: {}", err))
        })?;
        info!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

fn bind(
    library_dir: Option<&Path>,
) -> std::result::Result<Box<dyn PdfiumLibraryBindings>, PdfiumError> {
    let local = library_dir.map_or_else(|| PathBuf::from("./"), Path::to_path_buf);
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&local))
        .or_else(|_| Pdfium::bind_to_system_library())
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_pages(
        &self,
        data: &[u8],
        dpi: f32,
        sink: &mut dyn FnMut(RenderedPage) -> Result<()>,
    ) -> Result<()> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| LayerscopeError::Render(format!("cannot open document: {}", err)))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(dpi / POINTS_PER_INCH);

        for (index, page) in document.pages().iter().enumerate() {
            let number = index as u32 + 1;
            let bitmap = page
                .render_with_config(&config)
                .map_err(|err| LayerscopeError::Render(format!("page {}: {}", number, err)))?;
            let image = bitmap.as_image();
            debug!(page = number, width = image.width(), height = image.height(), "Page rendered");
            sink(RenderedPage { number, image })?;
        }
        Ok(())
    }
}
