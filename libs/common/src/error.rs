//! Custom error types for the common library
//!
//! This module defines the error type returned by the document store,
//! shared by every service that persists state through it.

use thiserror::Error;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while reading or writing a document file
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document could not be decoded
    #[error("Corrupt document '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be encoded for writing
    #[error("Failed to encode document '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
