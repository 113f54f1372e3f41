#![deny(unsafe_code)]

use clinic_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("filter {field}: {value} is not a number")]
    NotNumeric { field: String, value: String },

    #[error("filter {field}: invalid date bound {value:?}")]
    InvalidDate { field: String, value: String },

    #[error("unknown filter field: {0}")]
    UnknownField(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, FilterError>;
