// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LayerscopeError, Result};

const CONFIG_FILE: &str = "config.json";

/// Resolution at which pages are rasterised before OCR.
pub const DEFAULT_RENDER_DPI: f32 = 150.0;

/// Persistent scan settings.
///
/// Every field has a default, so a partial JSON file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// `None` means the ocrs cache directory.
    pub ocr_model_dir: Option<PathBuf>,
    /// Directory containing the PDFium shared library. `None` searches the
    /// working directory, then the system library path.
    pub pdfium_library_dir: Option<PathBuf>,
    /// Number of documents analysed concurrently.
    pub workers: usize,
    /// Rasterisation resolution for OCR.
    pub render_dpi: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ocr_model_dir: None,
            pdfium_library_dir: None,
            workers: 1,
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }
}

impl ScanConfig {
    /// Load a config from an explicit JSON file. Errors if the file is
    /// missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from the default location, falling back to defaults
    /// when no file exists there.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(LayerscopeError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        if !(self.render_dpi.is_finite() && self.render_dpi > 0.0) {
            return Err(LayerscopeError::Config(format!(
                "render_dpi must be positive, got {}",
                self.render_dpi
            )));
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/layerscope/config.json`, falling back to
/// `~/.config/layerscope/config.json`.
pub fn default_config_path() -> PathBuf {
    config_base().join("layerscope").join(CONFIG_FILE)
}

fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}
