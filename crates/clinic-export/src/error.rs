#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to flush export buffer: {0}")]
    Buffer(#[source] std::io::Error),

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no exportable columns: every column lacks a field or a header name")]
    NoColumns,

    #[error("refusing to overwrite existing file {0}")]
    FileExists(PathBuf),

    #[error("no download target accepted the export: {0}")]
    Undelivered(#[source] Box<ExportError>),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
