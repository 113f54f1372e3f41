use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),
    #[error("unknown filter prefix: {0}")]
    UnknownPrefix(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
