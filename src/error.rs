//! Application error taxonomy and its HTTP representation.
//!
//! Every fallible operation of the shortening core returns [`AppError`]. The
//! variants map one-to-one onto the failure kinds a caller can act upon:
//!
//! - [`AppError::InvalidUrl`] - the URL failed validation
//! - [`AppError::InvalidAlias`] - the alias is malformed or owned by another link
//! - [`AppError::LinkNotFound`] - nothing is stored under the alias
//! - [`AppError::Validation`] - the request itself is malformed (transport level)
//! - [`AppError::Internal`] - opaque storage or infrastructure failure
//!
//! A missing record is never an error inside the repositories: they return
//! `Ok(None)` and the service decides whether absence is a failure.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },
    #[error("{message}")]
    InvalidAlias { message: String, details: Value },
    #[error("{message}")]
    LinkNotFound { message: String, details: Value },
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_alias(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidAlias {
            message: message.into(),
            details,
        }
    }
    pub fn link_not_found(message: impl Into<String>, details: Value) -> Self {
        Self::LinkNotFound {
            message: message.into(),
            details,
        }
    }
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AppError::Internal { .. })
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. }
            | AppError::InvalidAlias { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::LinkNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Internal errors never expose their details.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::InvalidUrl { message, details } => ErrorInfo {
                code: "invalid_url",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::InvalidAlias { message, details } => ErrorInfo {
                code: "invalid_alias",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::LinkNotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Internal { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "Request rejected");
        } else if let AppError::Internal { message, details } = &self {
            tracing::error!(%details, "{}", message);
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            json!({ "reason": errors.to_string() }),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Primary key of the alias table; a violation means another link owns the alias.
const ALIAS_KEY_CONSTRAINT: &str = "link_aliases_pkey";

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        if db.constraint() == Some(ALIAS_KEY_CONSTRAINT) {
            return AppError::invalid_alias(
                "alias is already taken",
                json!({ "constraint": db.constraint() }),
            );
        }

        return AppError::internal(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    AppError::internal("Database error", json!({ "reason": e.to_string() }))
}
