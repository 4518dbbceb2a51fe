//! Error handling for the Warehouse Inventory Management platform
//!
//! Every failure surfaced to the routing layer is a distinguishable kind; the
//! routing layer owns the mapping to HTTP status codes and the JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors, detected before any store access
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Reference errors
    #[error("Unknown {entity} reference: {id}")]
    UnknownReference { entity: &'static str, id: i64 },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Store constraint errors
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflicting write: {0}")]
    ConflictingWrite(String),

    // Store connectivity; fatal to the call, not to the process
    #[error("Backing store unavailable")]
    StoreUnavailable,

    // Database errors not explained by the above
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::StoreUnavailable
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
                AppError::ConflictingWrite(constraint)
            }
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidQuantity(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_QUANTITY".to_string(),
                    message: msg.clone(),
                    field: Some("quantity".to_string()),
                },
            ),
            AppError::InvalidThreshold(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_THRESHOLD".to_string(),
                    message: msg.clone(),
                    field: Some("threshold".to_string()),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::UnknownReference { entity, id } => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "UNKNOWN_REFERENCE".to_string(),
                    message: format!("Unknown {} reference: {}", entity, id),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::ConflictingWrite(constraint) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICTING_WRITE".to_string(),
                    message: format!("Write conflicted on {}", constraint),
                    field: None,
                },
            ),
            AppError::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORE_UNAVAILABLE".to_string(),
                    message: "Backing store is temporarily unavailable".to_string(),
                    field: None,
                },
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
