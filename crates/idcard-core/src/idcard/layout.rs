//! Top-to-bottom ordering of fragments on the card.

use crate::models::fragment::Fragment;

/// Sort fragments by the top edge of their polygon.
///
/// Rows are compared as whole pixels (truncated toward zero), so fragments on
/// the same pixel row keep their input order. Fragments without a position
/// sort last, also in input order.
pub fn order_by_position(fragments: &[Fragment]) -> Vec<&Fragment> {
    let mut ordered: Vec<&Fragment> = fragments.iter().collect();
    ordered.sort_by_key(|fragment| row_key(fragment));
    ordered
}

fn row_key(fragment: &Fragment) -> (bool, i64) {
    match fragment.min_y() {
        Some(y) => (false, y.trunc() as i64),
        None => (true, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, y: f32) -> Fragment {
        Fragment::new(text).with_position(vec![[0.0, y], [50.0, y], [50.0, y + 20.0], [0.0, y + 20.0]])
    }

    fn texts<'a>(ordered: &[&'a Fragment]) -> Vec<&'a str> {
        ordered.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_sorts_by_top_edge() {
        let fragments = vec![at("c", 90.0), at("a", 5.0), at("b", 40.0)];
        assert_eq!(texts(&order_by_position(&fragments)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unpositioned_sort_last_in_input_order() {
        let fragments = vec![
            Fragment::new("x"),
            at("b", 40.0),
            Fragment::new("y"),
            at("a", 5.0),
        ];
        assert_eq!(texts(&order_by_position(&fragments)), vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_same_pixel_row_is_stable() {
        let fragments = vec![at("first", 10.8), at("second", 10.2), at("top", 9.9)];
        assert_eq!(
            texts(&order_by_position(&fragments)),
            vec!["top", "first", "second"]
        );
    }

    #[test]
    fn test_uses_minimum_y_of_polygon() {
        let tilted = Fragment::new("tilted").with_position(vec![[0.0, 60.0], [80.0, 20.0], [80.0, 45.0], [0.0, 85.0]]);
        let fragments = vec![at("flat", 30.0), tilted];
        assert_eq!(texts(&order_by_position(&fragments)), vec!["tilted", "flat"]);
    }

    #[test]
    fn test_empty() {
        assert!(order_by_position(&[]).is_empty());
    }
}
