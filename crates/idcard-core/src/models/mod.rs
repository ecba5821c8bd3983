//! Data models: OCR fragments, extracted fields and configuration.

pub mod config;
pub mod fields;
pub mod fragment;
