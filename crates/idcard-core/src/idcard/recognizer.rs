//! Image-to-record recognition: OCR engine followed by field extraction.

use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{OcrError, Result};
use crate::models::fields::IdCardFields;
use crate::models::fragment::{mean_confidence, Fragment};
use crate::ocr::OcrEngine;

use super::parser::IdCardParser;

/// Overall outcome of one recognition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionStatus {
    /// The ID number was located.
    Complete,
    /// Text was recognized but no ID number was found.
    MissingIdNumber,
    /// The engine recognized no text at all.
    NoText,
}

impl RecognitionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionStatus::Complete)
    }

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionStatus::Complete => "recognition succeeded",
            RecognitionStatus::MissingIdNumber => "recognition incomplete: ID number not found",
            RecognitionStatus::NoText => "no text recognized",
        }
    }
}

/// Result of recognizing one card.
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    /// Extracted fields.
    pub fields: IdCardFields,
    /// Mean fragment score.
    pub confidence: f32,
    /// Fragments the fields were extracted from.
    pub fragments: Vec<Fragment>,
    /// OCR plus extraction time in milliseconds.
    pub processing_time_ms: u64,
}

impl Recognition {
    /// Run extraction over fragments that were recognized elsewhere.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let start = Instant::now();
        let fields = IdCardParser::new().extract(&fragments);
        Self {
            confidence: mean_confidence(&fragments),
            fields,
            fragments,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    pub fn status(&self) -> RecognitionStatus {
        if self.fragments.is_empty() {
            RecognitionStatus::NoText
        } else if self.fields.is_complete() {
            RecognitionStatus::Complete
        } else {
            RecognitionStatus::MissingIdNumber
        }
    }
}

/// Recognizes ID cards with an injected OCR engine.
#[derive(Clone)]
pub struct IdCardRecognizer {
    engine: Arc<dyn OcrEngine>,
    parser: IdCardParser,
}

impl IdCardRecognizer {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            engine,
            parser: IdCardParser::new(),
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Recognize a decoded image.
    pub fn recognize(&self, image: &DynamicImage) -> std::result::Result<Recognition, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Recognizing ID card image: {}x{}", width, height);

        let fragments = self.engine.recognize(image)?;
        let fields = self.parser.extract(&fragments);
        let confidence = mean_confidence(&fragments);

        let recognition = Recognition {
            fields,
            confidence,
            fragments,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        match recognition.status() {
            RecognitionStatus::Complete => info!(
                "Recognized {} fields (confidence {:.2}) in {}ms",
                recognition.fields.len(),
                recognition.confidence,
                recognition.processing_time_ms
            ),
            status => warn!("{}", status.message()),
        }

        Ok(recognition)
    }

    /// Decode an encoded image (PNG, JPEG, ...) and recognize it.
    pub fn recognize_bytes(&self, bytes: &[u8]) -> Result<Recognition> {
        let image = image::load_from_memory(bytes)?;
        let image = DynamicImage::ImageRgb8(image.to_rgb8());
        Ok(self.recognize(&image)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdCardError;
    use crate::models::fields::FieldKey;
    use std::io::Cursor;

    struct FixedEngine(Vec<Fragment>);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<Vec<Fragment>, OcrError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<Vec<Fragment>, OcrError> {
            Err(OcrError::Recognition("boom".to_string()))
        }
    }

    fn recognizer(fragments: Vec<Fragment>) -> IdCardRecognizer {
        IdCardRecognizer::new(Arc::new(FixedEngine(fragments)))
    }

    fn blank_image() -> DynamicImage {
        DynamicImage::new_rgb8(32, 16)
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        blank_image()
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_complete_recognition() {
        let recognizer = recognizer(vec![
            Fragment::new("张三").with_score(0.8),
            Fragment::new("110101199001011234").with_score(0.6),
        ]);

        let recognition = recognizer.recognize(&blank_image()).unwrap();
        assert_eq!(recognition.status(), RecognitionStatus::Complete);
        assert_eq!(recognition.fields.get(FieldKey::Name), Some("张三"));
        assert!((recognition.confidence - 0.7).abs() < 1e-6);
        assert_eq!(recognizer.engine_name(), "fixed");
    }

    #[test]
    fn test_missing_id_number() {
        let recognizer = recognizer(vec![Fragment::new("张三")]);
        let recognition = recognizer.recognize(&blank_image()).unwrap();
        assert_eq!(recognition.status(), RecognitionStatus::MissingIdNumber);
        assert!(!recognition.status().is_success());
        assert_eq!(recognition.confidence, 0.0);
    }

    #[test]
    fn test_no_text() {
        let recognition = recognizer(Vec::new()).recognize(&blank_image()).unwrap();
        assert_eq!(recognition.status(), RecognitionStatus::NoText);
        assert!(recognition.fields.is_empty());
    }

    #[test]
    fn test_engine_error_is_propagated() {
        let recognizer = IdCardRecognizer::new(Arc::new(FailingEngine));
        assert!(matches!(
            recognizer.recognize(&blank_image()),
            Err(OcrError::Recognition(_))
        ));
    }

    #[test]
    fn test_recognize_bytes() {
        let recognizer = recognizer(vec![Fragment::new("110101199001011234")]);
        let recognition = recognizer.recognize_bytes(&png_bytes()).unwrap();
        assert_eq!(recognition.fields.id_number(), Some("110101199001011234"));
    }

    #[test]
    fn test_recognize_bytes_rejects_garbage() {
        let recognizer = recognizer(Vec::new());
        assert!(matches!(
            recognizer.recognize_bytes(b"definitely not an image"),
            Err(IdCardError::Image(_))
        ));
    }

    #[test]
    fn test_from_fragments() {
        let recognition = Recognition::from_fragments(vec![
            Fragment::new("男").with_score(1.0),
            Fragment::new("19900101").with_score(0.5),
        ]);
        assert_eq!(recognition.fields.sex(), Some("男"));
        assert_eq!(recognition.fields.birth_date(), Some("19900101"));
        assert_eq!(recognition.status(), RecognitionStatus::MissingIdNumber);
        assert!((recognition.confidence - 0.75).abs() < 1e-6);
    }
}
