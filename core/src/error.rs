//! Error types for the grades client.
//!
//! # Design
//! The grading service does not distinguish "course not found" from
//! "validation failed" in any structured way, so every non-2xx response
//! collapses into `Http` carrying the status code and its reason phrase.
//! Callers that need finer handling branch on [`GradesError::status`].
//! Failures without an HTTP response (connection refused, TLS, DNS) are
//! passed through untouched as `Transport`.

use thiserror::Error;

/// Errors returned by every gateway and manager operation.
#[derive(Debug, Error)]
pub enum GradesError {
    /// The server (token endpoint or resource endpoint) answered with a
    /// non-2xx status.
    #[error("Error {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GradesError {
    /// Builds an `Http` error from a raw status code, using the canonical
    /// reason phrase as status text.
    pub fn from_status(status: u16) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        GradesError::Http {
            status,
            status_text,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GradesError::Http { status, .. } => Some(*status),
            GradesError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GradesError>;
