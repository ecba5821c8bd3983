//! Layout-heuristic parser turning OCR fragments into ID card fields.

use tracing::debug;

use crate::models::fields::{FieldKey, IdCardFields};
use crate::models::fragment::Fragment;

use super::layout::order_by_position;
use super::rules::{
    char_len, find_id_number, is_address_fallback, is_address_near_id, is_birth_date,
    is_ethnicity, is_name, is_sex,
};

/// Parser for the front side of a resident ID card.
///
/// Relies on the card's fixed layout: name, sex, ethnicity and birth date are
/// printed above the ID number, and the address sits directly above it.
/// Stateless; one instance can be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdCardParser;

impl IdCardParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract fields from fragments in any order.
    pub fn extract(&self, fragments: &[Fragment]) -> IdCardFields {
        let ordered = order_by_position(fragments);
        let texts: Vec<&str> = ordered.iter().map(|f| f.trimmed()).collect();

        let mut fields = IdCardFields::new();

        let id_index = self.locate_id_number(&texts, &mut fields);

        // Without an ID number there is no boundary, so the whole card counts as "above".
        let above = &texts[..id_index.unwrap_or(texts.len())];
        self.classify_header(above, &mut fields);

        if let Some(index) = id_index {
            self.address_above_id(&texts[..index], &mut fields);
        }
        if !fields.contains(FieldKey::Address) {
            self.longest_address(&texts, &mut fields);
        }

        debug!(
            "Extracted {} fields from {} fragments (id number {})",
            fields.len(),
            fragments.len(),
            if fields.is_complete() { "found" } else { "missing" }
        );

        fields
    }

    fn locate_id_number(&self, texts: &[&str], fields: &mut IdCardFields) -> Option<usize> {
        texts.iter().enumerate().find_map(|(i, text)| {
            let id_number = find_id_number(text)?;
            debug!("ID number found in fragment {}", i);
            fields.set_if_absent(FieldKey::IdNumber, id_number);
            Some(i)
        })
    }

    /// At most one rule per fragment, tried in order; the first fragment
    /// matching a rule claims that field.
    fn classify_header(&self, texts: &[&str], fields: &mut IdCardFields) {
        for &text in texts {
            let key = if !fields.contains(FieldKey::Name) && is_name(text) {
                FieldKey::Name
            } else if is_sex(text) && !fields.contains(FieldKey::Sex) {
                FieldKey::Sex
            } else if is_ethnicity(text) && !fields.contains(FieldKey::Ethnicity) {
                FieldKey::Ethnicity
            } else if is_birth_date(text) && !fields.contains(FieldKey::BirthDate) {
                FieldKey::BirthDate
            } else {
                continue;
            };

            debug!("{} = {:?}", key, text);
            fields.set_if_absent(key, text);
        }
    }

    /// Nearest qualifying line, scanning upward from the ID number.
    fn address_above_id(&self, texts: &[&str], fields: &mut IdCardFields) {
        let address = texts
            .iter()
            .rev()
            .find(|text| !fields.contains_value(text) && is_address_near_id(text));

        if let Some(address) = address {
            debug!("address (above ID number) = {:?}", address);
            fields.set_if_absent(FieldKey::Address, *address);
        }
    }

    /// Longest qualifying line anywhere; the first one to reach the maximum wins.
    fn longest_address(&self, texts: &[&str], fields: &mut IdCardFields) {
        let mut best: Option<&str> = None;
        let mut max_len = 0;

        for &text in texts {
            let len = char_len(text);
            if len > max_len && !fields.contains_value(text) && is_address_fallback(text) {
                best = Some(text);
                max_len = len;
            }
        }

        if let Some(address) = best {
            debug!("address (longest line) = {:?}", address);
            fields.set_if_absent(FieldKey::Address, address);
        }
    }
}

/// Extract fields with a default parser.
pub fn extract_fields(fragments: &[Fragment]) -> IdCardFields {
    IdCardParser::new().extract(fragments)
}
