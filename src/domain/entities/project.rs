use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{
    content::{ContentEntity, DraftLists},
    document::Collection,
    language::Language,
    option_fields::OptionField,
};

// ───── Constants ──────────────────────────────────────────────────────
pub const DEFAULT_PROJECT_CATEGORY: &str = "nove-instalacije";
pub const DEFAULT_PROJECT_IMAGE: &str =
    "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=600&h=400&fit=crop";

const MAX_TITLE_LENGTH: u64 = 120;
const MAX_IMAGES: u64 = 20;

// ───── Entities ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
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
    pub full_description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub testimonial: Option<Testimonial>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub language: Language,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default = "default_image")]
    #[validate(custom(function = "validate_optional_url"))]
    pub image: String,

    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,

    #[serde(default)]
    #[validate(length(max = MAX_IMAGES), custom(function = "validate_image_urls"))]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
}

fn default_category() -> String {
    DEFAULT_PROJECT_CATEGORY.to_string()
}

fn default_image() -> String {
    DEFAULT_PROJECT_IMAGE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_optional_url"))]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_IMAGES), custom(function = "validate_image_urls"))]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub testimonial: OptionField<Testimonial>,
}

impl From<NewProject> for UpdateProjectRequest {
    fn from(draft: NewProject) -> Self {
        UpdateProjectRequest {
            language: Some(draft.language),
            title: Some(draft.title),
            description: Some(draft.description),
            short_description: Some(draft.short_description),
            details: Some(draft.details),
            full_description: Some(draft.full_description),
            category: Some(draft.category),
            image: Some(draft.image),
            client: Some(draft.client),
            location: Some(draft.location),
            year: Some(draft.year),
            duration: Some(draft.duration),
            budget: Some(draft.budget),
            technologies: Some(draft.technologies),
            challenges: Some(draft.challenges),
            solutions: Some(draft.solutions),
            results: Some(draft.results),
            images: Some(draft.images),
            testimonial: draft.testimonial.into(),
        }
    }
}

// ───── Validation Helpers ───────────────────────────────────────────

/// Empty means "no image"; anything else must be an http(s) URL.
pub fn validate_optional_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    validate_url(url)
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_image_urls(images: &[String]) -> Result<(), ValidationError> {
    images.iter().try_for_each(|url| validate_url(url))
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl ContentEntity for Project {
    type New = NewProject;
    type Patch = UpdateProjectRequest;

    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn language(&self) -> Language {
        self.language
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn blank_draft(language: Language) -> NewProject {
        NewProject {
            language,
            title: String::new(),
            description: String::new(),
            short_description: String::new(),
            details: String::new(),
            full_description: String::new(),
            category: default_category(),
            image: default_image(),
            client: String::new(),
            location: String::new(),
            year: String::new(),
            duration: String::new(),
            budget: String::new(),
            technologies: Vec::new(),
            challenges: Vec::new(),
            solutions: Vec::new(),
            results: Vec::new(),
            images: Vec::new(),
            testimonial: None,
        }
    }

    fn to_draft(&self) -> NewProject {
        NewProject {
            language: self.language,
            title: self.title.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            details: self.details.clone(),
            full_description: self.full_description.clone(),
            category: self.category.clone(),
            image: self.image.clone(),
            client: self.client.clone(),
            location: self.location.clone(),
            year: self.year.clone(),
            duration: self.duration.clone(),
            budget: self.budget.clone(),
            technologies: self.technologies.clone(),
            challenges: self.challenges.clone(),
            solutions: self.solutions.clone(),
            results: self.results.clone(),
            images: self.images.clone(),
            testimonial: self.testimonial.clone(),
        }
    }

    fn from_draft(
        id: String,
        draft: NewProject,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Project {
            id,
            language: draft.language,
            title: draft.title,
            description: draft.description,
            short_description: draft.short_description,
            details: draft.details,
            full_description: draft.full_description,
            category: draft.category,
            image: draft.image,
            client: draft.client,
            location: draft.location,
            year: draft.year,
            duration: draft.duration,
            budget: draft.budget,
            technologies: draft.technologies,
            challenges: draft.challenges,
            solutions: draft.solutions,
            results: draft.results,
            images: draft.images,
            testimonial: draft.testimonial,
            created_at,
            updated_at,
        }
    }
}

impl DraftLists for NewProject {
    const LIST_FIELDS: &'static [&'static str] =
        &["technologies", "challenges", "solutions", "results", "images"];

    fn list_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        match field {
            "technologies" => Some(&mut self.technologies),
            "challenges" => Some(&mut self.challenges),
            "solutions" => Some(&mut self.solutions),
            "results" => Some(&mut self.results),
            "images" => Some(&mut self.images),
            _ => None,
        }
    }
}
