// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::StorageError;
use crate::services::{Phase, ServiceError};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidIdentifier(String),
    MissingField(String),
    DuplicateName(String),
    InvalidJson(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    CascadeIncomplete {
        message: String,
        parent: Phase,
        references: Phase,
    },
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidIdentifier(_) => 400,
            ApiError::MissingField(_) => 400,
            ApiError::DuplicateName(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::CascadeIncomplete { .. } => 500,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidIdentifier(msg) => msg,
            ApiError::MissingField(msg) => msg,
            ApiError::DuplicateName(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::CascadeIncomplete { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            ApiError::MissingField(_) => "MISSING_FIELD",
            ApiError::DuplicateName(_) => "DUPLICATE_NAME",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::CascadeIncomplete { .. } => "CASCADE_INCOMPLETE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::CascadeIncomplete {
                message,
                parent,
                references,
            } => json!({
                "error": true,
                "message": message,
                "code": self.error_code(),
                "parent": parent,
                "references": references
            }),
            _ => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code()
            }),
        }
    }
}

impl ApiError {
    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidIdentifier(_) => ApiError::InvalidIdentifier(err.to_string()),
            ServiceError::MissingField(_) => ApiError::MissingField(err.to_string()),
            ServiceError::DuplicateName(_) => ApiError::DuplicateName(err.to_string()),
            ServiceError::NotFound { .. } => ApiError::not_found(err.to_string()),
            ServiceError::Cascade(cascade) => {
                tracing::error!("{}: {}", cascade, cascade.source);
                ApiError::CascadeIncomplete {
                    message: format!(
                        "The {} was only partially deleted",
                        cascade.collection.singular()
                    ),
                    parent: cascade.parent,
                    references: cascade.references,
                }
            }
            ServiceError::Storage(storage) => storage.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { .. } => ServiceError::from(err).into(),
            StorageError::Unavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            StorageError::ConfigMissing(_) | StorageError::InvalidDatabaseUrl => {
                tracing::error!("Storage misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            StorageError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
