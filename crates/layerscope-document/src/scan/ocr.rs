// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition for rendered pages, using the `ocrs` engine on `rten`.
//
// # Model Setup
//
// The engine needs two model files in one directory:
//
// - `text-detection.rten` locates text regions.
// - `text-recognition.rten` decodes the characters in each region.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where Layerscope looks unless
// `ocr_model_dir` is set in the config file.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use layerscope_core::config::ScanConfig;
use layerscope_core::error::{LayerscopeError, Result};
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::fallback::TextRecognizer;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where the two model files live.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn from_paths(
        detection_model: impl Into<PathBuf>,
        recognition_model: impl Into<PathBuf>,
    ) -> Self {
        Self {
            detection_model_path: detection_model.into(),
            recognition_model_path: recognition_model.into(),
        }
    }

    /// The configured model directory, or the default cache.
    pub fn from_scan_config(config: &ScanConfig) -> Self {
        match &config.ocr_model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Both model files must exist.
    pub fn validate(&self) -> Result<()> {
        for (role, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(LayerscopeError::OcrUnavailable(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download models",
                    role,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Loaded detection and recognition models, reusable across pages and
/// shared between workers.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load both models. This is the expensive step; build one engine per run.
    ///
    /// # Errors
    ///
    /// [`LayerscopeError::OcrUnavailable`] if a model file is missing or
    /// cannot be loaded.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path, "detection")?;
        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path, "recognition")?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            LayerscopeError::OcrUnavailable(format!("failed to initialise OCR engine: {}", err))
        })?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Recognise all text in `image`, lines separated by newlines.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_text(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            LayerscopeError::Ocr(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| LayerscopeError::Ocr(format!("OCR preprocessing failed: {}", err)))?;

        let text = self.engine.get_text(&input).map_err(|err| {
            LayerscopeError::Ocr(format!("OCR text recognition failed: {}", err))
        })?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}

impl TextRecognizer for OcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        self.recognize_text(image)
    }
}

fn load_model(path: &Path, role: &str) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        LayerscopeError::OcrUnavailable(format!(
            "failed to load {} model from {}: {}",
            role,
            path.display(),
            err
        ))
    })
}

/// The default model directory, for diagnostics.
pub fn model_directory() -> PathBuf {
    default_model_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_to_cache_dir() {
        let config = OcrConfig::default();
        let path_str = config.detection_model_path.to_string_lossy();
        assert!(
            path_str.ends_with(DETECTION_MODEL_FILENAME),
            "detection model path should end with {DETECTION_MODEL_FILENAME}, got {path_str}"
        );
        assert!(config.detection_model_path.starts_with(model_directory()));
    }

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn config_from_paths() {
        let config = OcrConfig::from_paths("/a/detect.rten", "/b/recog.rten");
        assert_eq!(config.detection_model_path, PathBuf::from("/a/detect.rten"));
        assert_eq!(config.recognition_model_path, PathBuf::from("/b/recog.rten"));
    }

    #[test]
    fn scan_config_model_dir_wins() {
        let scan = ScanConfig {
            ocr_model_dir: Some(PathBuf::from("/opt/models")),
            ..ScanConfig::default()
        };
        let config = OcrConfig::from_scan_config(&scan);
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/opt/models/text-recognition.rten")
        );
    }

    #[test]
    fn missing_models_mean_unavailable() {
        let config = OcrConfig::from_dir("/nonexistent/path/ocr-models");
        assert!(matches!(
            config.validate(),
            Err(LayerscopeError::OcrUnavailable(_))
        ));
        assert!(OcrEngine::new(config).is_err());
    }
}
