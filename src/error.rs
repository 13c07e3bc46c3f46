//! Error types for the Bookshelf server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Stable machine-readable codes returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BookNotFound,
    TagNotFound,
    TagExists,
    BookExists,
    ValidationError,
    ServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BookNotFound => "book_not_found",
            ErrorCode::TagNotFound => "tag_not_found",
            ErrorCode::TagExists => "tag_exists",
            ErrorCode::BookExists => "book_exists",
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::ServerError => "server_error",
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book {0} not found")]
    BookNotFound(i32),

    #[error("Tag {0} not found")]
    TagNotFound(i32),

    #[error("Tag '{0}' already exists")]
    TagExists(String),

    #[error("Book '{0}' already exists")]
    BookExists(String),

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let field = field.to_string();
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field, message)
            })
            .collect();
        // field_errors() is a HashMap, sort so the reported field is deterministic
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => AppError::Validation { field, message },
            None => AppError::validation("body", errors.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match rejection {
            JsonRejection::JsonDataError(_) => json_error_field(&message),
            _ => None,
        };
        AppError::validation(field.unwrap_or_else(|| "body".to_string()), message)
    }
}

/// Every path parameter of the API is a numeric `id`
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("id", rejection.body_text())
    }
}

/// `with_tags` is the only query parameter the API accepts
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("with_tags", rejection.body_text())
    }
}

/// Field named by a JSON deserialization error, either a missing field or
/// the path prefix of a type error (`page_count: invalid type ...`).
fn json_error_field(message: &str) -> Option<String> {
    if let Some((_, rest)) = message.split_once("missing field `") {
        return rest.split_once('`').map(|(field, _)| field.to_string());
    }

    let detail = message
        .split_once("target type: ")
        .map(|(_, detail)| detail)
        .unwrap_or(message);
    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
    /// Offending field, for validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            AppError::BookNotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorCode::BookNotFound,
                "Book Not Found".to_string(),
                None,
            ),
            AppError::TagNotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorCode::TagNotFound,
                "Tag Not Found".to_string(),
                None,
            ),
            AppError::TagExists(_) => (
                StatusCode::FORBIDDEN,
                ErrorCode::TagExists,
                "Tag already exists".to_string(),
                None,
            ),
            AppError::BookExists(_) => (
                StatusCode::CONFLICT,
                ErrorCode::BookExists,
                "Book already exists".to_string(),
                None,
            ),
            AppError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::ValidationError,
                message,
                Some(field),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ServerError,
                    "Oops! Something went wrong".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ServerError,
                    "Oops! Something went wrong".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            message,
            error_code: code.as_str().to_string(),
            field,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    has_sqlstate(e, UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    has_sqlstate(e, FOREIGN_KEY_VIOLATION)
}

fn has_sqlstate(e: &sqlx::Error, state: &str) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == state)
        .unwrap_or(false)
}
