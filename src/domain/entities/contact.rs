use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::sanitize::sanitize_plain_text;

/// Contact form on the public page. Acknowledged, never stored.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 40))]
    pub phone: Option<String>,

    #[validate(length(min = 5, max = 2000))]
    pub message: String,
}

impl ContactForm {
    pub fn sanitized(self) -> ContactForm {
        ContactForm {
            name: sanitize_plain_text(&self.name),
            email: self.email.trim().to_string(),
            phone: self.phone.map(|p| sanitize_plain_text(&p)),
            message: sanitize_plain_text(&self.message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactAcknowledgement {
    pub message: String,
}
