use std::path::PathBuf;

use clinic_filter::FilterError;
use clinic_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON rows {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV rows {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse report definition {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path} holds {found}, expected an array of rows or an object with data/rows/results/items")]
    NotRows { path: PathBuf, found: &'static str },

    #[error("invalid filter {key:?}: {message}")]
    InvalidFilter { key: String, message: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_filter(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
