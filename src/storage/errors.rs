//! # Store Errors
//!
//! The single error taxonomy shared by every store operation. Expected
//! conditions (missing record, duplicate key, bad arguments) are ordinary
//! results, never panics; filesystem failures surface as `Io`.

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by registry, record, and query operations
#[derive(Debug, Error)]
pub enum StoreError {
    // ==================
    // Caller Errors
    // ==================
    /// Bad table name, unregistered table, or zero record size
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No record with that uuid in that table
    #[error("record not found")]
    NotFound,

    /// Insert on a uuid that already holds a record
    #[error("record already exists")]
    AlreadyExists,

    // ==================
    // Codec Errors
    // ==================
    /// Record could not be encoded, or exceeds the table's size bound
    #[error("encode failed: {0}")]
    Encode(String),

    /// Stored bytes could not be decoded under the table's codec
    #[error("decode failed: {0}")]
    Decode(String),

    // ==================
    // Filesystem Errors
    // ==================
    /// Underlying filesystem open/read/write/remove failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Shorthand for an `InvalidArgument` with a formatted message
    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }
}
