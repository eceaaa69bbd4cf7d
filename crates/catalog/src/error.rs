//! Error types for the catalog crate.
//!
//! Every record that crosses a boundary (network response or stored blob)
//! goes through the validation in `types`/`parser`, and anything that does
//! not fit the schema ends up as a `ParseError`.

use thiserror::Error;

use crate::types::MovieId;

/// Errors raised while decoding or validating movie records
///
/// `Clone` and `PartialEq` are derived so the error can be carried inside
/// observable state and compared in tests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input was not valid JSON, or did not have the expected shape
    #[error("Malformed JSON: {0}")]
    Json(String),

    /// A field had a value outside of its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same movie id appeared twice in a sequence that must be unique
    #[error("Duplicate movie id {0}")]
    DuplicateId(MovieId),
}

impl ParseError {
    pub(crate) fn invalid(field: &str, value: impl ToString) -> Self {
        ParseError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ParseError>;
