//! Decoding of the raw catalog payload into category-partitioned records.
//!
//! The payload is a JSON object keyed by set labels (`"Basic"`, `"Hall of
//! Fame"`, `"Journey to Un'Goro"`, ...), each mapping to an array of card
//! objects. Structure is validated strictly; individual records are not.

use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::models::card::CardRecord;
use crate::models::category::Category;

// ---------------------------------------------------------------------------
// DecodeMode
// ---------------------------------------------------------------------------

/// How unknown top-level keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// An unknown category label fails decoding.
    #[default]
    Strict,
    /// Unknown category labels are logged and skipped.
    Lenient,
}

// ---------------------------------------------------------------------------
// CatalogPayload
// ---------------------------------------------------------------------------

/// The decoded dataset: one ordered list of records per known category.
///
/// Categories absent from the payload are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPayload {
    categories: [Vec<CardRecord>; 19],
}

impl CatalogPayload {
    /// Decode a raw payload in [`DecodeMode::Strict`].
    pub fn decode(raw: &[u8]) -> Result<Self> {
        Self::decode_with(raw, DecodeMode::Strict)
    }

    /// Decode a raw payload with the given mode.
    pub fn decode_with(raw: &[u8], mode: DecodeMode) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| CatalogError::malformed("$", format!("invalid JSON: {}", e)))?;
        Self::from_value(value, mode)
    }

    /// Decode an already-parsed JSON document.
    pub fn from_value(value: Value, mode: DecodeMode) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(CatalogError::malformed(
                    "$",
                    format!("expected an object of categories, found {}", json_kind(&other)),
                ))
            }
        };

        let mut payload = CatalogPayload::default();
        for (label, cards) in map {
            let category = match Category::from_label(&label) {
                Some(c) => c,
                None => match mode {
                    DecodeMode::Strict => {
                        return Err(CatalogError::malformed(
                            label,
                            "unknown category label",
                        ))
                    }
                    DecodeMode::Lenient => {
                        log::warn!("Skipping unknown catalog category {:?}", label);
                        continue;
                    }
                },
            };

            let records = match cards {
                Value::Array(records) => records,
                other => {
                    return Err(CatalogError::malformed(
                        label,
                        format!("expected an array of cards, found {}", json_kind(&other)),
                    ))
                }
            };

            payload.categories[category.index()] = records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    if !record.is_object() {
                        log::warn!(
                            "Card {}[{}] is not an object; using an empty record",
                            label,
                            i
                        );
                    }
                    CardRecord::from_value(record)
                })
                .collect();
        }

        Ok(payload)
    }

    /// Records of a single category, in payload order.
    pub fn category(&self, category: Category) -> &[CardRecord] {
        &self.categories[category.index()]
    }

    /// All records, concatenated in [`Category::ALL`] order.
    pub fn get_all_cards(&self) -> Vec<CardRecord> {
        self.iter().cloned().collect()
    }

    /// Borrowing iterator over all records in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.categories.iter().flatten()
    }

    /// Non-empty categories with their record counts.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.category(*c).len()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
