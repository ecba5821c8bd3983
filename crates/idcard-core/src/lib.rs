//! Core library for Chinese resident ID card OCR.
//!
//! This crate provides:
//! - OCR fragment and extracted-field data models
//! - Layout-heuristic field extraction (ID number, name, sex, ethnicity, birth date, address)
//! - An injectable OCR engine seam, with a `pure-onnx-ocr` backend behind the `native` feature
//! - Typed configuration for the engine and the HTTP API

pub mod error;
pub mod models;
pub mod ocr;
pub mod idcard;

pub use error::{IdCardError, OcrError, Result};
pub use models::config::IdCardConfig;
pub use models::fields::{FieldKey, IdCardFields};
pub use models::fragment::{mean_confidence, Fragment, Point};
pub use ocr::OcrEngine;
#[cfg(feature = "native")]
pub use ocr::{create_engine, PureOcrEngine};
pub use idcard::{extract_fields, IdCardParser, IdCardRecognizer, Recognition, RecognitionStatus};
