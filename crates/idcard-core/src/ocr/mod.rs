//! OCR engine seam.
//!
//! Text detection and recognition are an external capability; the rest of the
//! crate only sees the fragments an engine returns. Engines are constructed by
//! the caller and handed to [`crate::IdCardRecognizer`].

#[cfg(feature = "native")]
mod pure_engine;
#[cfg(feature = "native")]
mod worker;

#[cfg(feature = "native")]
pub use pure_engine::{create_engine, PureOcrEngine};

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::fragment::Fragment;

/// A text detection + recognition engine.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs and metadata.
    fn name(&self) -> &str;

    /// Recognize all text regions in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Fragment>, OcrError>;
}
