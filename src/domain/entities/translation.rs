use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{
    content::{ContentEntity, DraftLists},
    document::Collection,
    language::Language,
    option_fields::OptionField,
};

/// Dynamic, store-backed string override. Secondary to the static tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: String,
    pub language: Language,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewTranslation {
    pub language: Language,

    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,

    #[validate(length(min = 1, message = "Value is required"))]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTranslationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Key cannot be empty"))]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub context: OptionField<String>,
}

impl From<NewTranslation> for UpdateTranslationRequest {
    fn from(draft: NewTranslation) -> Self {
        UpdateTranslationRequest {
            language: Some(draft.language),
            key: Some(draft.key),
            value: Some(draft.value),
            context: draft.context.into(),
        }
    }
}

impl ContentEntity for Translation {
    type New = NewTranslation;
    type Patch = UpdateTranslationRequest;

    const COLLECTION: Collection = Collection::Translations;

    fn id(&self) -> &str {
        &self.id
    }

    fn language(&self) -> Language {
        self.language
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn blank_draft(language: Language) -> NewTranslation {
        NewTranslation {
            language,
            key: String::new(),
            value: String::new(),
            context: None,
        }
    }

    fn to_draft(&self) -> NewTranslation {
        NewTranslation {
            language: self.language,
            key: self.key.clone(),
            value: self.value.clone(),
            context: self.context.clone(),
        }
    }

    fn from_draft(
        id: String,
        draft: NewTranslation,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Translation {
            id,
            language: draft.language,
            key: draft.key,
            value: draft.value,
            context: draft.context,
            created_at,
            updated_at,
        }
    }
}

impl DraftLists for NewTranslation {
    const LIST_FIELDS: &'static [&'static str] = &[];

    fn list_mut(&mut self, _field: &str) -> Option<&mut Vec<String>> {
        None
    }
}
