//! Configuration structures for the recognition pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IdCardError, Result};

/// Main configuration for the idcard pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCardConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// HTTP API configuration.
    pub server: ServerConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,

    /// Drop fragments whose recognition score is below this value (0.0 keeps all).
    pub min_score: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            min_score: 0.0,
        }
    }
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "ch_PP-OCRv3_det_infer.onnx".to_string(),
            recognition_model: "ch_PP-OCRv3_rec_infer.onnx".to_string(),
            dictionary: "ppocr_keys_v1.txt".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for a TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl IdCardConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ocr.min_score) {
            return Err(IdCardError::Config(format!(
                "ocr.min_score must be between 0 and 1, got {}",
                self.ocr.min_score
            )));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(IdCardError::Config(
                "server.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IdCardConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(
            config.models.recognition_path(),
            PathBuf::from("models").join("ch_PP-OCRv3_rec_infer.onnx")
        );
        assert!(!config.ocr.keep_unk);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: IdCardConfig =
            serde_json::from_str(r#"{"server": {"port": 8080}, "models": {"model_dir": "/opt/ocr"}}"#)
                .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.models.detection_path(),
            PathBuf::from("/opt/ocr").join("ch_PP-OCRv3_det_infer.onnx")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = IdCardConfig::default();
        config.ocr.min_score = 0.25;
        config.save(&path).unwrap();

        let loaded = IdCardConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.min_score, 0.25);
        assert_eq!(loaded.models.dictionary, "ppocr_keys_v1.txt");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = IdCardConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, IdCardError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IdCardConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IdCardError::Io(_)));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ocr": {"min_score": 1.5}}"#).unwrap();

        match IdCardConfig::from_file(&path) {
            Err(IdCardError::Config(msg)) => assert!(msg.contains("ocr.min_score")),
            other => panic!("expected a config error, got {:?}", other),
        }

        let mut config = IdCardConfig::default();
        config.server.max_upload_bytes = 0;
        assert!(matches!(config.validate(), Err(IdCardError::Config(_))));
        assert!(IdCardConfig::default().validate().is_ok());
    }
}
