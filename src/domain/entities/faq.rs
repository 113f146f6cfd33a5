use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{
    content::{ContentEntity, DraftLists},
    document::Collection,
    language::Language,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub language: Language,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFaq {
    pub language: Language,

    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,

    #[validate(length(min = 1, message = "Answer is required"))]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFaqRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Answer cannot be empty"))]
    pub answer: Option<String>,
}

impl From<NewFaq> for UpdateFaqRequest {
    fn from(draft: NewFaq) -> Self {
        UpdateFaqRequest {
            language: Some(draft.language),
            question: Some(draft.question),
            answer: Some(draft.answer),
        }
    }
}

impl ContentEntity for Faq {
    type New = NewFaq;
    type Patch = UpdateFaqRequest;

    const COLLECTION: Collection = Collection::Faqs;

    fn id(&self) -> &str {
        &self.id
    }

    fn language(&self) -> Language {
        self.language
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn blank_draft(language: Language) -> NewFaq {
        NewFaq {
            language,
            question: String::new(),
            answer: String::new(),
        }
    }

    fn to_draft(&self) -> NewFaq {
        NewFaq {
            language: self.language,
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }

    fn from_draft(
        id: String,
        draft: NewFaq,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Faq {
            id,
            language: draft.language,
            question: draft.question,
            answer: draft.answer,
            created_at,
            updated_at,
        }
    }
}

impl DraftLists for NewFaq {
    const LIST_FIELDS: &'static [&'static str] = &[];

    fn list_mut(&mut self, _field: &str) -> Option<&mut Vec<String>> {
        None
    }
}
