//! Pattern rules for resident ID card fields.

pub mod patterns;

pub use patterns::*;

/// Length in characters (Unicode scalar values), not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether `text` contains at least one Chinese character.
///
/// Bounds are exclusive at both ends of U+4E00..U+9FFF.
pub fn has_chinese(text: &str) -> bool {
    text.chars()
        .any(|c| ('\u{4e01}'..='\u{9ffe}').contains(&c))
}

/// First run of 18 digits anywhere in `text`.
pub fn find_id_number(text: &str) -> Option<&str> {
    ID_NUMBER_RUN.find(text).map(|m| m.as_str())
}

/// `text` contains an 18-digit run.
pub fn contains_id_number(text: &str) -> bool {
    ID_NUMBER_RUN.is_match(text)
}

/// `text` is exactly 18 digits.
pub fn is_id_number(text: &str) -> bool {
    ID_NUMBER_EXACT.is_match(text)
}

/// 2-4 Chinese characters.
pub fn is_name(text: &str) -> bool {
    NAME.is_match(text)
}

/// Exactly one of 男 / 女.
pub fn is_sex(text: &str) -> bool {
    SEX.is_match(text)
}

/// 1-4 Chinese characters.
pub fn is_ethnicity(text: &str) -> bool {
    ETHNICITY.is_match(text)
}

/// Exactly 8 digits (YYYYMMDD as printed, not validated).
pub fn is_birth_date(text: &str) -> bool {
    BIRTH_DATE.is_match(text)
}

/// Address candidate in the region above the ID number.
pub fn is_address_near_id(text: &str) -> bool {
    char_len(text) > 4 && !contains_id_number(text) && !is_birth_date(text) && has_chinese(text)
}

/// Address candidate for the whole-card fallback scan.
pub fn is_address_fallback(text: &str) -> bool {
    !is_id_number(text) && !is_birth_date(text) && has_chinese(text)
}
