//! Error types for the Veil Mail SDK.

use serde::Deserialize;

/// Result type for SDK operations.
pub type VeilMailResult<T> = Result<T, VeilMailError>;

/// Error types that can occur when talking to the Veil Mail API.
#[derive(Debug, thiserror::Error)]
pub enum VeilMailError {
    /// HTTP request failed before a response was received.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl VeilMailError {
    /// Create an API error from a status code, its reason phrase and the
    /// response body.
    ///
    /// The message comes from the body's `message` field when the body is
    /// JSON and the field is a non-empty string, otherwise from the reason
    /// phrase.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| status_text.to_string());

        Self::Api { status, message }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error body returned by the Veil Mail API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
