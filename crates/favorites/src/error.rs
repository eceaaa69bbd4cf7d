//! Error types for the favorites crate.

use catalog::ParseError;
use thiserror::Error;

/// Errors from the local key-value store or from decoding what it holds
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file or directory could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend failed for a reason other than plain I/O
    #[error("Storage backend failure: {0}")]
    Backend(String),

    /// The stored value exists but is not a valid favorites list
    #[error("Stored favorites are malformed: {0}")]
    Parse(#[from] ParseError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StorageError>;
