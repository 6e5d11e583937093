//! Error types for the todo API client.
//!
//! 400 and 404 get dedicated variants carrying the server's `errorMessage`,
//! since callers act on "bad input" and "no such todo" differently. Any
//! other unexpected status lands in `HttpError` with the raw body.

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the input (400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The todo does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
