//! OCR fragments as produced by the recognition engine.

use serde::{Deserialize, Deserializer, Serialize};

/// A polygon vertex `(x, y)` in image pixels.
pub type Point = [f32; 2];

/// One recognized line or region of text.
///
/// Mirrors the JSON shape emitted by PaddleOCR-style engines:
/// `{"text": "...", "score": 0.93, "position": [[x, y], ...]}`.
/// Every field may be missing on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Recognized characters.
    #[serde(default)]
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Bounding polygon of the region.
    #[serde(
        default,
        deserialize_with = "deserialize_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Vec<Point>>,
}

/// Vertices need at least `[x, y]`; extra coordinates are ignored.
fn deserialize_position<'de, D>(deserializer: D) -> Result<Option<Vec<Point>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(vertices) = Option::<Vec<Vec<f32>>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    vertices
        .into_iter()
        .map(|vertex| match vertex.as_slice() {
            [x, y, ..] => Ok([*x, *y]),
            _ => Err(serde::de::Error::custom(format!(
                "vertex needs x and y coordinates, got {} value(s)",
                vertex.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            position: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_position(mut self, position: Vec<Point>) -> Self {
        self.position = Some(position);
        self
    }

    /// Confidence, with a missing score counted as zero.
    pub fn score_or_zero(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }

    /// Topmost y coordinate of the polygon, if the fragment has one.
    pub fn min_y(&self) -> Option<f32> {
        self.position
            .as_ref()?
            .iter()
            .map(|p| p[1])
            .reduce(f32::min)
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Mean confidence over all fragments, 0 when there are none.
pub fn mean_confidence(fragments: &[Fragment]) -> f32 {
    if fragments.is_empty() {
        return 0.0;
    }
    let total: f32 = fragments.iter().map(Fragment::score_or_zero).sum();
    total / fragments.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_engine_output() {
        let json = r#"[
            {"text": "张三", "score": 0.98, "position": [[10, 12], [80, 12], [80, 40], [10, 40]]},
            {"text": "男"},
            {"score": 0.5}
        ]"#;
        let fragments: Vec<Fragment> = serde_json::from_str(json).unwrap();

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].min_y(), Some(12.0));
        assert_eq!(fragments[1].score, None);
        assert_eq!(fragments[1].position, None);
        assert_eq!(fragments[2].text, "");
    }

    #[test]
    fn test_deserialize_extra_coordinates() {
        let fragment: Fragment =
            serde_json::from_str(r#"{"text": "男", "position": [[1, 20, 0], [5, 18, 0.5]], "score": null}"#)
                .unwrap();
        assert_eq!(fragment.position, Some(vec![[1.0, 20.0], [5.0, 18.0]]));
        assert_eq!(fragment.min_y(), Some(18.0));

        let fragment: Fragment = serde_json::from_str(r#"{"text": "男", "position": null}"#).unwrap();
        assert_eq!(fragment.position, None);
    }

    #[test]
    fn test_deserialize_rejects_short_vertex() {
        let result = serde_json::from_str::<Fragment>(r#"{"text": "男", "position": [[1]]}"#);
        assert!(result.unwrap_err().to_string().contains("vertex needs x and y"));
    }

    #[test]
    fn test_min_y() {
        let fragment = Fragment::new("x").with_position(vec![[0.0, 30.5], [5.0, 12.25], [5.0, 40.0]]);
        assert_eq!(fragment.min_y(), Some(12.25));

        assert_eq!(Fragment::new("x").min_y(), None);
        assert_eq!(Fragment::new("x").with_position(Vec::new()).min_y(), None);
    }

    #[test]
    fn test_mean_confidence() {
        let fragments = vec![
            Fragment::new("a").with_score(0.9),
            Fragment::new("b").with_score(0.5),
            Fragment::new("c"),
        ];
        let mean = mean_confidence(&fragments);
        assert!((mean - 1.4 / 3.0).abs() < 1e-6);

        assert_eq!(mean_confidence(&[]), 0.0);
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(Fragment::new("  张三 \t").trimmed(), "张三");
    }
}
