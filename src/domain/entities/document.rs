use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::language::Language;

pub type Fields = Map<String, Value>;

/// Field names owned by the data-access layer. Callers never set them.
pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";
pub const LANGUAGE_FIELD: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Projects,
    Faqs,
    Translations,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Projects => "projects",
            Collection::Faqs => "faqs",
            Collection::Translations => "translations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record: store-assigned id, free-form fields and server timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn language(&self) -> Option<&str> {
        self.fields.get(LANGUAGE_FIELD).and_then(Value::as_str)
    }

    pub fn matches_language(&self, language: Language) -> bool {
        self.language() == Some(language.as_str())
    }

    /// Flattens id and timestamps into the fields and decodes the result.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.into(), Value::String(self.id));
        fields.insert(CREATED_AT_FIELD.into(), serde_json::to_value(self.created_at)?);
        fields.insert(UPDATED_AT_FIELD.into(), serde_json::to_value(self.updated_at)?);
        serde_json::from_value(Value::Object(fields))
    }
}

/// Equality filter on a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn language(language: Language) -> Self {
        FieldFilter {
            field: LANGUAGE_FIELD.to_string(),
            value: Value::String(language.as_str().to_string()),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.fields.get(&self.field) == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreatedAtDesc,
}

/// Serializes a payload into writable fields, dropping layer-owned keys.
pub fn writable_fields<T: Serialize>(payload: &T) -> Result<Fields, serde_json::Error> {
    let value = serde_json::to_value(payload)?;
    let mut fields = match value {
        Value::Object(map) => map,
        other => {
            return Err(serde::ser::Error::custom(format!(
                "payload must serialize to an object, got {}",
                other
            )));
        }
    };
    for owned in [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD] {
        fields.remove(owned);
    }
    Ok(fields)
}
