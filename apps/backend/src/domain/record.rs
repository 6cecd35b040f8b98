//! Hidden entity records and their sanitized views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Field carrying the display name players must guess.
pub const DISPLAY_NAME_FIELD: &str = "CHARACTER";
/// Field naming the work the entity comes from.
pub const SOURCE_FIELD: &str = "SOURCE";
/// Field naming who portrayed the entity.
pub const PORTRAYAL_FIELD: &str = "PORTRAYED_BY";
/// Identifier assigned by the persistent store.
pub const STORAGE_ID_FIELD: &str = "_id";

/// Fields never sent upstream or cached against.
pub const IDENTITY_FIELDS: [&str; 3] = [DISPLAY_NAME_FIELD, SOURCE_FIELD, STORAGE_ID_FIELD];

/// Fields never offered as hint topics.
pub const HINT_EXCLUDED_FIELDS: [&str; 4] = [
    DISPLAY_NAME_FIELD,
    SOURCE_FIELD,
    PORTRAYAL_FIELD,
    STORAGE_ID_FIELD,
];

/// A hidden entity: field name → arbitrary JSON value.
///
/// Backed by a `BTreeMap`, so iteration and serialization are always in
/// lexicographic field order. Cache keys depend on that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, JsonValue>);

impl Record {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The name players must guess, or `""` when the record has none.
    pub fn display_name(&self) -> &str {
        self.0
            .get(DISPLAY_NAME_FIELD)
            .and_then(JsonValue::as_str)
            .unwrap_or("")
    }

    /// Copy of the record without identity fields.
    pub fn sanitized(&self) -> Record {
        Record(
            self.0
                .iter()
                .filter(|(k, _)| !IDENTITY_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Field names eligible as hint topics.
    pub fn hint_fields(&self) -> Vec<&str> {
        self.field_names()
            .filter(|k| !HINT_EXCLUDED_FIELDS.contains(k))
            .collect()
    }

    /// Compact serialization with fixed field order.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Indented serialization used as the upstream context block.
    pub fn pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl From<BTreeMap<String, JsonValue>> for Record {
    fn from(map: BTreeMap<String, JsonValue>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, JsonValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
