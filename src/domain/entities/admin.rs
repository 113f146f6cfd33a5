use serde::{Deserialize, Serialize};
use validator::Validate;

/// An account known to the identity provider.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}
