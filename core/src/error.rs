//! Error types for the event API client.
//!
//! # Design
//! `Validation` is raised by the `build_*` methods, so a request with a
//! missing key never reaches a transport. `RemoteRequestFailure` is reserved
//! for responses whose body reports a failure status; every other unexpected
//! response lands in `NotFound` or `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `EventClient`, `EventService` and the transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was absent or empty. No request was sent.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// The remote service reported a failure status in the response body.
    #[error("unable to perform remote action on the platform: {0}")]
    RemoteRequestFailure(String),

    /// The server returned 404 without a failure body.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The HTTP round-trip itself failed (connect, TLS, read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// Platform configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns true for errors raised locally before any request was built.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }
}

/// Reject an absent or empty required field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation { field });
    }
    Ok(())
}
