//! # Error Handling
//!
//! One closed error type for the whole application. Every handler failure
//! ends up as one of these variants, and every variant renders as an HTML
//! page, so no request failure can take the process down.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::views::Page;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid input or a unique-constraint violation on create (422)
    #[error("{0}")]
    Validation(String),

    /// Lookup miss (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid session reference (401)
    #[error("Invalid session: {0}")]
    Session(String),

    /// Database failure (500). Details are logged, never shown.
    #[error("Database error: {0}")]
    Persistence(#[source] sqlx::Error),

    /// Game status changed since it was loaded (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Game status could not be converted to or from JSON (500)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session store or other unexpected failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Maps sqlx errors onto the closed taxonomy
///
/// - unique/primary key violations are the caller's fault: Validation
/// - `RowNotFound` is a lookup miss: NotFound
/// - everything else is a Persistence failure
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("no matching row".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Validation(format!("already exists: {}", db.message()))
            }
            _ => AppError::Persistence(e),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("Session error: {}", e))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to put in front of a user
    ///
    /// Infrastructure errors collapse to a generic message; the detail only
    /// goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Persistence(_) => "Database error".to_string(),
            AppError::Serialization(_) => "Serialization error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Persistence(e) => tracing::error!("Database error: {:?}", e),
            AppError::Serialization(e) => tracing::error!("Serialization error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::debug!("Request failed: {}", self),
        }

        let status = self.status_code();
        match Page::new("Error").with_error(self.user_message()).render("error", Value::Null) {
            Ok(html) => (status, html).into_response(),
            Err(e) => {
                tracing::error!("Error page failed to render: {}", e);
                (status, self.user_message()).into_response()
            }
        }
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
