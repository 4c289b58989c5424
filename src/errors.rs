// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// PostgreSQL SQLSTATE for unique constraint violations
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations (ON DELETE RESTRICT)
const SQLSTATE_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Application-specific error types
/// DOCUMENTATION: Every failure is terminal for the current request;
/// each variant maps to an HTTP status code and JSON error body
#[derive(Error, Debug)]
pub enum BoroughsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Cannot delete {0}: it is still referenced by other records")]
    Protected(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error")]
    #[allow(dead_code)]
    InternalError,
}

impl BoroughsError {
    /// Classify a sqlx failure by its SQLSTATE
    /// DOCUMENTATION: `what` names the record involved ("borough 'Foo'", "user 42")
    pub fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        };

        let classified = Self::from_sqlstate(code.as_deref(), what, &err.to_string());
        if let BoroughsError::DatabaseError(_) = classified {
            log::error!("Database failure on {}: {}", what, err);
        } else {
            log::warn!("Constraint violation on {}: {}", what, err);
        }
        classified
    }

    /// Map a SQLSTATE code onto an error variant
    fn from_sqlstate(code: Option<&str>, what: &str, message: &str) -> Self {
        match code {
            Some(SQLSTATE_UNIQUE_VIOLATION) => BoroughsError::AlreadyExists(what.to_string()),
            Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => BoroughsError::Protected(what.to_string()),
            _ => BoroughsError::DatabaseError(message.to_string()),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BoroughsError::NotFound(_) => "NOT_FOUND",
            BoroughsError::AlreadyExists(_) => "ALREADY_EXISTS",
            BoroughsError::Protected(_) => "PROTECTED",
            BoroughsError::DatabaseError(_) => "DATABASE_ERROR",
            BoroughsError::InvalidInput(_) => "INVALID_INPUT",
            BoroughsError::ValidationError(_) => "VALIDATION_ERROR",
            BoroughsError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            BoroughsError::Unauthorized => "UNAUTHORIZED",
            BoroughsError::Forbidden => "FORBIDDEN",
            BoroughsError::StorageError(_) => "STORAGE_ERROR",
            BoroughsError::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for BoroughsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BoroughsError::ValidationError(errors.to_string())
    }
}

/// Convert BoroughsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for BoroughsError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BoroughsError::NotFound(_) => StatusCode::NOT_FOUND,
            BoroughsError::AlreadyExists(_) => StatusCode::CONFLICT,
            BoroughsError::Protected(_) => StatusCode::CONFLICT,
            BoroughsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BoroughsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BoroughsError::ValidationError(_) => StatusCode::BAD_REQUEST,
            BoroughsError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            BoroughsError::Unauthorized => StatusCode::UNAUTHORIZED,
            BoroughsError::Forbidden => StatusCode::FORBIDDEN,
            BoroughsError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BoroughsError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
