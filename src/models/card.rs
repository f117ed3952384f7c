use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config;

// ---------------------------------------------------------------------------
// Mechanic
// ---------------------------------------------------------------------------

/// A tagged key/value attribute of a card, e.g. `{"name": "Deathrattle"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mechanic(pub BTreeMap<String, String>);

impl Mechanic {
    /// Build a mechanic with a single `name` attribute.
    pub fn named(name: &str) -> Self {
        Mechanic(BTreeMap::from([("name".to_string(), name.to_string())]))
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Non-string attribute values are dropped.
    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let attrs = map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect();
        Some(Mechanic(attrs))
    }
}

// ---------------------------------------------------------------------------
// CardRecord: one catalog entry, every field optional
// ---------------------------------------------------------------------------

/// A single card as delivered by the catalog.
///
/// Nothing is required. Decoding never fails on a field: a missing key or a
/// value of the wrong JSON type simply leaves the field as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_set: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "flavor", skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collectible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_class_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(rename = "img", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "imgGold", skip_serializing_if = "Option::is_none")]
    pub gold_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanics: Option<Vec<Mechanic>>,
}

impl CardRecord {
    /// Decode a record from an arbitrary JSON value.
    ///
    /// Anything that is not an object yields an empty record.
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self::from_map(map),
            None => CardRecord::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        CardRecord {
            card_id: get_str(map, "cardId"),
            name: get_str(map, "name"),
            card_set: get_str(map, "cardSet"),
            type_field: get_str(map, "type"),
            rarity: get_str(map, "rarity"),
            cost: get_i64(map, "cost"),
            attack: get_i64(map, "attack"),
            health: get_i64(map, "health"),
            text: get_str(map, "text"),
            flavor_text: get_str(map, "flavor"),
            artist: get_str(map, "artist"),
            collectible: get_bool(map, "collectible"),
            elite: get_bool(map, "elite"),
            player_class: get_str(map, "playerClass"),
            multi_class_group: get_str(map, "multiClassGroup"),
            classes: get_str_list(map, "classes"),
            image: get_str(map, "img"),
            gold_image: get_str(map, "imgGold"),
            locale: get_str(map, "locale"),
            mechanics: map.get("mechanics").and_then(|v| v.as_array()).map(|arr| {
                arr.iter().filter_map(Mechanic::from_value).collect()
            }),
        }
    }

    /// Key used to track this card in a favorites store: the card id, or the
    /// name when the id is missing.
    pub fn favorite_key(&self) -> Option<&str> {
        self.card_id.as_deref().or(self.name.as_deref())
    }

    /// True when any mechanic's `name` attribute equals `name`.
    pub fn has_mechanic(&self, name: &str) -> bool {
        self.mechanics
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|m| m.name() == Some(name))
    }

    /// A Legendary card with the Deathrattle mechanic.
    pub fn is_featured(&self) -> bool {
        self.rarity.as_deref() == Some(config::FEATURED_RARITY)
            && self.has_mechanic(config::FEATURED_MECHANIC)
    }
}

impl<'de> Deserialize<'de> for CardRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(CardRecord::from_value(&value))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn get_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn get_i64(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(|v| v.as_i64())
}

fn get_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(|v| v.as_bool())
}

fn get_str_list(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    map.get(key).and_then(|v| v.as_array()).map(|arr| {
        arr.iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect()
    })
}
