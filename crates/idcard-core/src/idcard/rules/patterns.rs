//! Regex patterns for resident ID card fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Citizen ID number (18 digits)
    pub static ref ID_NUMBER_RUN: Regex = Regex::new(r"\d{18}").unwrap();

    pub static ref ID_NUMBER_EXACT: Regex = Regex::new(r"^\d{18}$").unwrap();

    // Name (2-4 Chinese characters)
    pub static ref NAME: Regex = Regex::new(r"^[\x{4e00}-\x{9fa5}]{2,4}$").unwrap();

    // Sex
    pub static ref SEX: Regex = Regex::new(r"^[男女]$").unwrap();

    // Ethnicity (1-4 Chinese characters)
    pub static ref ETHNICITY: Regex = Regex::new(r"^[\x{4e00}-\x{9fa5}]{1,4}$").unwrap();

    // Birth date as printed (8 digits)
    pub static ref BIRTH_DATE: Regex = Regex::new(r"^\d{8}$").unwrap();
}
