//! Error types for the scoring service client.

use thiserror::Error;

/// Errors returned by service calls and session storage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// No bearer token is stored; nothing was sent.
    #[error("not logged in")]
    Unauthenticated,

    /// The service rejected the bearer token (HTTP 401).
    #[error("session expired or token rejected")]
    AuthExpired,

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}{}", detail_suffix(.detail))]
    Api {
        /// HTTP status code.
        status: u16,
        /// `detail` from the error body, or the body text.
        detail: Option<String>,
    },

    /// Request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Success status, but the body was not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Session storage I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Session storage contained invalid JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Returns a user-friendly error message suitable for terminal output.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please log in first (loanscore login).".to_string(),
            Self::AuthExpired => "Your session has expired. Please log in again.".to_string(),
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { status, .. } => format!("Server error: {status}"),
            Self::Network(_) => {
                "Could not reach the scoring service. Please check the API URL and your connection."
                    .to_string()
            }
            Self::MalformedResponse(_) => {
                "The scoring service sent an unexpected response.".to_string()
            }
            Self::Io(_) | Self::Json(_) => "Could not read or write the local session.".to_string(),
        }
    }

    /// Whether the error means the session is gone.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status, when the service answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
