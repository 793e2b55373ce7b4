#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preprocessing artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown field '{field}' in {section} of {path}")]
    UnknownField {
        path: PathBuf,
        section: &'static str,
        field: String,
    },

    #[error("field order in {path} does not match the model: {message}")]
    FieldOrder { path: PathBuf, message: String },

    #[error("invalid parameter for {field} in {path}: {message}")]
    InvalidParameter {
        path: PathBuf,
        field: String,
        message: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
