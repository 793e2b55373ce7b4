//! Error types for scoring workflows.

use std::path::PathBuf;

use loanscore_client::ClientError;
use loanscore_model::ValidationIssue;
use thiserror::Error;

/// Errors from batch, single-record and export workflows.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The scoring service call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A single record failed the form rules; nothing was sent.
    #[error("record failed validation: {}", join_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown contact status '{0}' (expected contacted, not_contacted or unreachable)")]
    UnknownContactStatus(String),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure means the user must log in again.
    #[must_use]
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Client(ClientError::AuthExpired | ClientError::Unauthenticated)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
