//! The central error responder.
//!
//! # Design
//! Handlers detect validation and not-found conditions themselves and return
//! the matching `ApiError` variant. Everything else (store and connectivity
//! failures) arrives as `StoreError` through `?` and is classified as
//! `Unknown`. `IntoResponse` is the single place that turns a kind into a
//! status code and an `{"errorMessage": ...}` body; internal details are
//! logged and never sent to the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

pub const TODO_NOT_FOUND: &str = "Todo does not exist.";
pub const TODO_INFO_NOT_FOUND: &str = "Todo information does not exist.";
pub const INTERNAL_ERROR: &str = "An error occurred on the server.";

/// Errors a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The referenced todo does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything the handler did not anticipate.
    #[error(transparent)]
    Unknown(#[from] StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn todo_not_found() -> Self {
        Self::NotFound(TODO_NOT_FOUND.to_string())
    }

    /// Not-found as reported by delete, which words it differently.
    pub fn todo_info_not_found() -> Self {
        Self::NotFound(TODO_INFO_NOT_FOUND.to_string())
    }

    /// Name of the error kind, used for classification in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound(_) => "NotFoundError",
            Self::Unknown(_) => "UnknownError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            Self::Unknown(source) => {
                tracing::error!(kind = self.kind(), error = %source, "request failed");
                INTERNAL_ERROR.to_string()
            }
            other => {
                tracing::debug!(kind = other.kind(), message = %other, "request rejected");
                other.to_string()
            }
        };
        (status, Json(ErrorBody { error_message })).into_response()
    }
}
