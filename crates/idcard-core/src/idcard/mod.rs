//! Resident ID card field extraction.

mod layout;
mod parser;
mod recognizer;
pub mod rules;

pub use layout::order_by_position;
pub use parser::{extract_fields, IdCardParser};
pub use recognizer::{IdCardRecognizer, Recognition, RecognitionStatus};
