use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{
    content::{ContentEntity, DraftLists},
    document::Collection,
    language::Language,
};

pub const DEFAULT_SERVICE_ICON: &str = "⚡";

const MAX_TITLE_LENGTH: u64 = 120;
const MAX_SHORT_TEXT_LENGTH: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub language: Language,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub process: Vec<String>,
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub language: Language,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub short_description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub process: Vec<String>,
    #[serde(default)]
    pub included: Vec<String>,
}

fn default_icon() -> String {
    DEFAULT_SERVICE_ICON.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<String>>,
}

impl From<NewService> for UpdateServiceRequest {
    fn from(draft: NewService) -> Self {
        UpdateServiceRequest {
            language: Some(draft.language),
            title: Some(draft.title),
            description: Some(draft.description),
            short_description: Some(draft.short_description),
            details: Some(draft.details),
            icon: Some(draft.icon),
            price: Some(draft.price),
            warranty: Some(draft.warranty),
            duration: Some(draft.duration),
            materials: Some(draft.materials),
            brands: Some(draft.brands),
            process: Some(draft.process),
            included: Some(draft.included),
        }
    }
}

impl ContentEntity for Service {
    type New = NewService;
    type Patch = UpdateServiceRequest;

    const COLLECTION: Collection = Collection::Services;

    fn id(&self) -> &str {
        &self.id
    }

    fn language(&self) -> Language {
        self.language
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn blank_draft(language: Language) -> NewService {
        NewService {
            language,
            title: String::new(),
            description: String::new(),
            short_description: String::new(),
            details: String::new(),
            icon: default_icon(),
            price: String::new(),
            warranty: String::new(),
            duration: String::new(),
            materials: Vec::new(),
            brands: Vec::new(),
            process: Vec::new(),
            included: Vec::new(),
        }
    }

    fn to_draft(&self) -> NewService {
        NewService {
            language: self.language,
            title: self.title.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            details: self.details.clone(),
            icon: self.icon.clone(),
            price: self.price.clone(),
            warranty: self.warranty.clone(),
            duration: self.duration.clone(),
            materials: self.materials.clone(),
            brands: self.brands.clone(),
            process: self.process.clone(),
            included: self.included.clone(),
        }
    }

    fn from_draft(
        id: String,
        draft: NewService,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Service {
            id,
            language: draft.language,
            title: draft.title,
            description: draft.description,
            short_description: draft.short_description,
            details: draft.details,
            icon: draft.icon,
            price: draft.price,
            warranty: draft.warranty,
            duration: draft.duration,
            materials: draft.materials,
            brands: draft.brands,
            process: draft.process,
            included: draft.included,
            created_at,
            updated_at,
        }
    }
}

impl DraftLists for NewService {
    const LIST_FIELDS: &'static [&'static str] = &["materials", "brands", "process", "included"];

    fn list_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        match field {
            "materials" => Some(&mut self.materials),
            "brands" => Some(&mut self.brands),
            "process" => Some(&mut self.process),
            "included" => Some(&mut self.included),
            _ => None,
        }
    }
}
