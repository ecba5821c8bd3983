//! The structured record extracted from an ID card.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity card field, in extraction priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    IdNumber,
    Name,
    Sex,
    Ethnicity,
    BirthDate,
    Address,
}

impl FieldKey {
    /// All keys in priority order.
    pub const ALL: [FieldKey; 6] = [
        FieldKey::IdNumber,
        FieldKey::Name,
        FieldKey::Sex,
        FieldKey::Ethnicity,
        FieldKey::BirthDate,
        FieldKey::Address,
    ];

    /// Machine-readable key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::IdNumber => "id_number",
            FieldKey::Name => "name",
            FieldKey::Sex => "sex",
            FieldKey::Ethnicity => "ethnicity",
            FieldKey::BirthDate => "birth_date",
            FieldKey::Address => "address",
        }
    }

    /// Caption printed on the card, as used by Baidu-compatible responses.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::IdNumber => "公民身份号码",
            FieldKey::Name => "姓名",
            FieldKey::Sex => "性别",
            FieldKey::Ethnicity => "民族",
            FieldKey::BirthDate => "出生",
            FieldKey::Address => "住址",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields located on one card. A field is present only if some fragment
/// satisfied its rule; once set it is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCardFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl IdCardFields {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: FieldKey) -> &Option<String> {
        match key {
            FieldKey::IdNumber => &self.id_number,
            FieldKey::Name => &self.name,
            FieldKey::Sex => &self.sex,
            FieldKey::Ethnicity => &self.ethnicity,
            FieldKey::BirthDate => &self.birth_date,
            FieldKey::Address => &self.address,
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut Option<String> {
        match key {
            FieldKey::IdNumber => &mut self.id_number,
            FieldKey::Name => &mut self.name,
            FieldKey::Sex => &mut self.sex,
            FieldKey::Ethnicity => &mut self.ethnicity,
            FieldKey::BirthDate => &mut self.birth_date,
            FieldKey::Address => &mut self.address,
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.slot(key).is_some()
    }

    /// Store `value` under `key` unless the key is already set.
    /// Returns whether the value was stored.
    pub fn set_if_absent(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        let slot = self.slot_mut(key);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    /// Whether any present field holds exactly `value`.
    pub fn contains_value(&self, value: &str) -> bool {
        self.iter().any(|(_, v)| v == value)
    }

    /// Present fields in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        FieldKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A record counts as recognized once the ID number is known.
    pub fn is_complete(&self) -> bool {
        self.id_number.is_some()
    }

    pub fn id_number(&self) -> Option<&str> {
        self.id_number.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sex(&self) -> Option<&str> {
        self.sex.as_deref()
    }

    pub fn ethnicity(&self) -> Option<&str> {
        self.ethnicity.as_deref()
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Present fields keyed by their printed Chinese caption.
    pub fn labeled(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(key, value)| (key.label(), value.to_string()))
            .collect()
    }
}
