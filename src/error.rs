//! Error taxonomy shared by the repository and HTTP layers.
//!
//! Every error renders as the standard `{error: true, message}` JSON
//! envelope; no request error crashes the process.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Required request parameters absent or empty. Raised before any
    /// store access.
    #[error("Please enter all necessary fields: {0}")]
    MissingFields(String),

    /// A parameter was present but malformed.
    #[error("{0}")]
    Validation(String),

    /// Referenced club / player / challenge does not resolve.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique-constraint style clashes (duplicate email, repeated result).
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    Unauthorized,

    /// A step of a multi-statement mutation failed; everything before it
    /// was rolled back.
    #[error("transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Map a sqlx error from an INSERT/UPDATE into the taxonomy:
    /// unique violations become [`ApiError::Conflict`] with the given
    /// message, foreign-key violations become [`ApiError::NotFound`].
    pub fn classify(err: sqlx::Error, conflict_msg: &str, missing: &'static str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.code().as_deref() {
                Some("23505") => return ApiError::Conflict(conflict_msg.to_string()),
                Some("23503") => return ApiError::NotFound(missing),
                _ => {}
            }
        }
        ApiError::Database(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Transaction(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::warn!("request failed: {self:?}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": true,
            "message": self.to_string(),
        }))
    }
}
