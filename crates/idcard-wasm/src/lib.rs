//! WASM bindings for Chinese resident ID card field extraction.
//!
//! OCR runs on the JavaScript side; these bindings take the recognized
//! fragments and return the extracted fields.

use std::collections::BTreeMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use idcard_core::{extract_fields as extract, mean_confidence, Fragment, IdCardFields};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Debug, Serialize)]
struct Extraction {
    success: bool,
    data: IdCardFields,
    words_result: BTreeMap<&'static str, String>,
    confidence: f32,
}

impl Extraction {
    fn from_fragments(fragments: &[Fragment]) -> Self {
        let data = extract(fragments);
        Self {
            success: data.is_complete(),
            words_result: data.labeled(),
            confidence: mean_confidence(fragments),
            data,
        }
    }
}

/// Plain JS objects rather than `Map`s, so results can go straight to `JSON.stringify`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn extract_json(input: &str) -> Result<String, String> {
    let fragments: Vec<Fragment> = serde_json::from_str(input).map_err(|e| e.to_string())?;
    serde_json::to_string(&Extraction::from_fragments(&fragments)).map_err(|e| e.to_string())
}

/// Extract fields from an array of `{text, score?, position?}` objects.
#[wasm_bindgen]
pub fn extract_fields(fragments: JsValue) -> Result<JsValue, JsValue> {
    let fragments: Vec<Fragment> = serde_wasm_bindgen::from_value(fragments)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&Extraction::from_fragments(&fragments))
}

/// Same as `extract_fields`, JSON string in and out.
#[wasm_bindgen]
pub fn extract_fields_json(fragments: &str) -> Result<String, JsValue> {
    extract_json(fragments).map_err(|e| js_sys::Error::new(&e).into())
}

/// Whether the text is exactly an 18-digit ID number.
#[wasm_bindgen]
pub fn is_id_number(text: &str) -> bool {
    idcard_core::idcard::rules::is_id_number(text.trim())
}

/// Accumulates fragments from browser-side OCR, one box at a time.
#[wasm_bindgen]
#[derive(Default)]
pub struct FragmentCollector {
    fragments: Vec<Fragment>,
}

#[wasm_bindgen]
impl FragmentCollector {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment with its four corner points.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        text: &str,
        score: f32,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
    ) {
        self.fragments.push(
            Fragment::new(text)
                .with_score(score)
                .with_position(vec![[x1, y1], [x2, y2], [x3, y3], [x4, y4]]),
        );
    }

    /// Add a fragment with no position; it is ordered after positioned ones.
    pub fn add_text(&mut self, text: &str, score: f32) {
        self.fragments.push(Fragment::new(text).with_score(score));
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.fragments.len()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn extract(&self) -> Result<JsValue, JsValue> {
        to_js(&Extraction::from_fragments(&self.fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_extract_json() {
        let input = r#"[
            {"text": "中华人民共和国居民身份证", "score": 0.9, "position": [[0, 0], [90, 0]]},
            {"text": "张三", "score": 0.9, "position": [[0, 10], [40, 10]]},
            {"text": "北京市朝阳区建国路1号", "score": 0.8, "position": [[0, 40], [200, 40]]},
            {"text": "110101199001011234", "score": 0.7, "position": [[0, 90], [200, 90]]}
        ]"#;

        let output: Value = serde_json::from_str(&extract_json(input).unwrap()).unwrap();
        assert_eq!(output["success"], true);
        assert_eq!(output["data"]["name"], "张三");
        assert_eq!(output["data"]["address"], "北京市朝阳区建国路1号");
        assert_eq!(output["words_result"]["公民身份号码"], "110101199001011234");
    }

    #[test]
    fn test_extract_json_rejects_garbage() {
        assert!(extract_json("{\"text\": 1").is_err());
    }

    #[test]
    fn test_collector_orders_unpositioned_last() {
        let mut collector = FragmentCollector::new();
        collector.add_text("北京市朝阳区建国路1号", 0.5);
        collector.add("110101199001011234", 0.9, 0.0, 90.0, 1.0, 90.0, 1.0, 95.0, 0.0, 95.0);
        assert_eq!(collector.length(), 2);

        let extraction = Extraction::from_fragments(&collector.fragments);
        assert!(extraction.success);
        // The address sits after the ID once ordered, so only the fallback pass finds it.
        assert_eq!(extraction.data.address(), Some("北京市朝阳区建国路1号"));
    }
}
