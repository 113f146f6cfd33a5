use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::entities::document::Collection;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    PermissionDenied(String),
    UnauthorizedAccess,
    ForbiddenAccess,
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "{}", msg),
            AppError::UnauthorizedAccess => write!(f, "Unauthorized access"),
            AppError::ForbiddenAccess => write!(f, "Forbidden access"),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::PermissionDenied(msg) => {
                serde_json::json!({
                    "error": msg,
                    "action": "login"
                })
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionDenied(_) => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenAccess => StatusCode::FORBIDDEN,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DataError::PermissionDenied { message, .. } => AppError::PermissionDenied(message),
            DataError::OperationFailed { message, .. } => AppError::InternalError(message),
            DataError::Invalid { errors, .. } => AppError::from(errors),
        }
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Busy(_) => AppError::Conflict(err.to_string()),
            EditorError::UnknownEntity { .. } => AppError::NotFound(err.to_string()),
            EditorError::Data(data) => AppError::from(data),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

// ───── Document store ───────────────────────────────────────────────

/// Failures reported by a document store backend.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum StoreError {
    #[display("permission denied: {_0}")]
    PermissionDenied(String),

    #[display("ordering not supported: {_0}")]
    OrderingUnsupported(String),

    #[display("document not found")]
    Missing,

    #[display("{_0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // 42501 insufficient_privilege
            sqlx::Error::Database(e) if e.code().as_deref() == Some("42501") => {
                StoreError::PermissionDenied(e.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

// ───── Data access ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Operation::Fetch => "accessing",
            Operation::Add => "adding",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        }
    }
}

#[derive(Debug, Display)]
pub enum DataError {
    #[display("{collection} document {id} not found")]
    NotFound { collection: Collection, id: String },

    #[display("{message}")]
    PermissionDenied { collection: Collection, operation: Operation, message: String },

    #[display("{message}")]
    OperationFailed { collection: Collection, operation: Operation, message: String },

    #[display("Invalid {collection} payload: {errors}")]
    Invalid { collection: Collection, errors: ValidationErrors },
}

impl DataError {
    /// Write attempted without a session.
    pub fn unauthenticated(collection: Collection, operation: Operation) -> Self {
        DataError::PermissionDenied {
            collection,
            operation,
            message: format!(
                "Permission denied {} {}. User not authenticated. Please log in first.",
                operation.gerund(),
                collection
            ),
        }
    }

    /// Wraps a store failure with the collection and operation it happened in.
    pub fn from_store(collection: Collection, operation: Operation, err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(reason) => DataError::PermissionDenied {
                collection,
                operation,
                message: format!(
                    "Permission denied {} {}: {}. Please check access rules and ensure you're logged in.",
                    operation.gerund(),
                    collection,
                    reason
                ),
            },
            other => DataError::OperationFailed {
                collection,
                operation,
                message: format!("Failed to {} {}: {}", operation.verb(), collection, other),
            },
        }
    }

    pub fn malformed(collection: Collection, operation: Operation, err: serde_json::Error) -> Self {
        DataError::OperationFailed {
            collection,
            operation,
            message: format!("Failed to {} {}: malformed document: {}", operation.verb(), collection, err),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DataError::PermissionDenied { .. })
    }
}

// ───── Admin editor ─────────────────────────────────────────────────

#[derive(Debug, Display)]
pub enum EditorError {
    #[display("Another {_0} entry is already being added, edited or deleted")]
    Busy(Collection),

    #[display("No {_0} draft is open")]
    NoDraft(Collection),

    #[display("{collection} entry {id} is not loaded in the workspace")]
    UnknownEntity { collection: Collection, id: String },

    #[display("No {_0} deletion is awaiting confirmation")]
    NoPendingDelete(Collection),

    #[display("Unknown list field: {_0}")]
    UnknownListField(String),

    #[display("List index {index} out of range for {field}")]
    IndexOutOfRange { field: String, index: usize },

    #[display("{_0}")]
    Data(DataError),
}

impl From<DataError> for EditorError {
    fn from(err: DataError) -> Self {
        EditorError::Data(err)
    }
}

// ───── Auth ─────────────────────────────────────────────────────────

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid token")]
    InvalidToken,

    #[display("Wrong credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Token expired")]
    TokenExpired,

    #[display("Missing credentials")]
    MissingCredentials,

    #[display("Missing JWT service")]
    MissingJwtService,

    #[display("Forbidden: {_0}")]
    Forbidden(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        let error_message = match self {
            AuthError::TokenExpired => "Token has expired".to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"error": error_message}))
    }
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingJwtService => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(_: ValidationErrors) -> Self {
        AuthError::MissingCredentials
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

impl std::error::Error for PasswordError {}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_permission_failures_stay_distinct_from_other_failures() {
        let denied = DataError::from_store(
            Collection::Services,
            Operation::Add,
            StoreError::PermissionDenied("rules rejected write".into()),
        );
        let failed = DataError::from_store(
            Collection::Services,
            Operation::Add,
            StoreError::Backend("connection reset".into()),
        );

        assert!(denied.is_permission_denied());
        assert!(denied.to_string().contains("adding services"));
        assert!(!failed.is_permission_denied());
        assert_eq!(failed.to_string(), "Failed to add services: connection reset");
    }

    #[test]
    fn permission_denied_maps_to_unauthorized_with_login_action() {
        let err = AppError::from(DataError::unauthenticated(Collection::Faqs, Operation::Delete));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.to_string().contains("deleting faqs"));
    }

    #[test]
    fn busy_editor_is_a_conflict() {
        let err = AppError::from(EditorError::Busy(Collection::Projects));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
