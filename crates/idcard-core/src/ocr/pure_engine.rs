//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{IdCardConfig, ModelConfig, OcrConfig};
use crate::models::fragment::{Fragment, Point};

use super::worker::EngineWorker;
use super::OcrEngine;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// The inner engine is not `Send`, so it lives on its own thread and this
/// handle forwards images to it. Concurrent callers are served in turn.
pub struct PureOcrEngine {
    worker: EngineWorker,
}

impl PureOcrEngine {
    /// Load detection and recognition models plus the character dictionary.
    pub fn new(models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = models.detection_path();
        let rec_path = models.recognition_path();
        let dict_path = models.dictionary_path();

        for path in [&det_path, &rec_path, &dict_path] {
            ensure_exists(path)?;
        }

        let worker = EngineWorker::spawn(
            "pure-onnx-ocr",
            move || {
                pure_onnx_ocr::engine::OcrEngineBuilder::new()
                    .det_model_path(&det_path)
                    .rec_model_path(&rec_path)
                    .dictionary_path(&dict_path)
                    .build()
                    .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))
            },
            move |engine: &pure_onnx_ocr::engine::OcrEngine, image: &DynamicImage| {
                run_engine(engine, image, &config)
            },
        )?;

        info!("Loaded pure-onnx-ocr engine from {}", models.model_dir.display());

        Ok(Self { worker })
    }
}

impl OcrEngine for PureOcrEngine {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Fragment>, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("empty image {}x{}", width, height)));
        }

        self.worker.run(image.clone())
    }
}

fn run_engine(
    engine: &pure_onnx_ocr::engine::OcrEngine,
    image: &DynamicImage,
    config: &OcrConfig,
) -> Result<Vec<Fragment>, OcrError> {
    let start = Instant::now();
    debug!("Running OCR on {}x{} image", image.width(), image.height());

    let results = engine
        .run_from_image(image)
        .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

    debug!("pure-onnx-ocr returned {} text regions", results.len());

    let fragments: Vec<Fragment> = results
        .iter()
        .filter(|r| r.confidence >= config.min_score)
        .map(|r| {
            Fragment::new(clean_text(&r.text, config.keep_unk))
                .with_score(r.confidence)
                .with_position(polygon_to_points(&r.bounding_box))
        })
        .filter(|f| !f.trimmed().is_empty())
        .collect();

    debug!(
        "Kept {} fragments in {}ms",
        fragments.len(),
        start.elapsed().as_millis()
    );

    Ok(fragments)
}

/// `[UNK]` marks characters missing from the dictionary.
fn clean_text(text: &str, keep_unk: bool) -> String {
    if keep_unk {
        text.to_string()
    } else {
        text.replace("[UNK]", " ")
    }
}

/// Build the engine described by a configuration.
pub fn create_engine(config: &IdCardConfig) -> Result<PureOcrEngine, OcrError> {
    PureOcrEngine::new(&config.models, config.ocr.clone())
}

fn ensure_exists(path: &Path) -> Result<(), OcrError> {
    if path.exists() {
        Ok(())
    } else {
        Err(OcrError::ModelNotFound(path.to_path_buf()))
    }
}

/// Convert a `Polygon<f64>` to the fragment's vertex list.
///
/// Takes the first 4 exterior points; the ring's closing point repeats the first.
fn polygon_to_points(polygon: &pure_onnx_ocr::Polygon<f64>) -> Vec<Point> {
    polygon
        .exterior()
        .coords()
        .take(4)
        .map(|coord| [coord.x as f32, coord.y as f32])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_shareable() {
        fn assert_engine<T: OcrEngine + Send + Sync + 'static>() {}
        assert_engine::<PureOcrEngine>();
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("张[UNK]三", false), "张 三");
        assert_eq!(clean_text("张[UNK]三", true), "张[UNK]三");
    }

    #[test]
    fn test_missing_models_are_reported_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let models = ModelConfig {
            model_dir: dir.path().to_path_buf(),
            ..ModelConfig::default()
        };

        match PureOcrEngine::new(&models, OcrConfig::default()) {
            Err(OcrError::ModelNotFound(path)) => assert_eq!(path, models.detection_path()),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("engine built without model files"),
        }
    }
}
