//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod output;
pub mod recognize;
pub mod serve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use idcard_core::{create_engine, IdCardConfig, IdCardRecognizer, OcrError};

/// Image extensions accepted by `recognize` and `batch`.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idcard")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IdCardConfig> {
    if let Some(path) = config_path {
        return Ok(IdCardConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(IdCardConfig::from_file(&default_path)?)
    } else {
        Ok(IdCardConfig::default())
    }
}

/// Build the recognizer; this is where the OCR engine's lifetime begins.
pub fn build_recognizer(
    config: &IdCardConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<IdCardRecognizer> {
    let mut config = config.clone();
    if let Some(dir) = model_dir {
        config.models.model_dir = dir.to_path_buf();
    }

    let engine = create_engine(&config).map_err(|e| match e {
        OcrError::ModelNotFound(path) => anyhow::anyhow!(
            "OCR model file not found: {}\n\n\
             Place {}, {} and {} in {} or pass --model-dir.",
            path.display(),
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary,
            config.models.model_dir.display()
        ),
        other => anyhow::anyhow!("Failed to initialize OCR engine: {}", other),
    })?;

    Ok(IdCardRecognizer::new(Arc::new(engine)))
}
