//! Error types for Folio
//!
//! This module defines all error types used by the store and the wrapper
//! functions built on it. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! Store errors are surfaced to callers unchanged: wrapper operations return
//! exactly the error the store produced.

use crate::types::DocId;
use std::io;
use thiserror::Error;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Folio store
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations on the data directory or log)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Data corruption detected while reading the log
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Log record cut short; not enough bytes to decode it
    #[error("Incomplete entry at offset {offset}: have {have} bytes, need {needed}")]
    IncompleteEntry {
        /// File offset of the record
        offset: u64,
        /// Bytes available
        have: usize,
        /// Bytes required
        needed: usize,
    },

    /// Invalid argument or malformed request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A string could not be parsed as a document identifier
    #[error("Invalid document id: '{0}'")]
    InvalidId(String),

    /// A document failed schema validation
    #[error("Validation failed for '{path}': {reason}")]
    Validation {
        /// Field path that failed
        path: String,
        /// Why it failed
        reason: String,
    },

    /// A document with the same identifier already exists
    #[error("Duplicate key: document {0} already exists")]
    DuplicateKey(DocId),

    /// The addressed document does not exist
    #[error("Document not found: {0}")]
    DocumentNotFound(DocId),

    /// The database has been closed
    #[error("Database is closed")]
    Closed,
}

impl Error {
    /// Build a validation error for a field path
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an invalid-input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput(reason.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_display_validation() {
        let err = Error::validation("name", "Path `name` is required");
        let msg = err.to_string();
        assert!(msg.contains("Validation failed"));
        assert!(msg.contains("'name'"));
        assert!(msg.contains("required"));
    }

    #[test]
    fn test_error_display_duplicate_key() {
        let id = DocId::new();
        let msg = Error::DuplicateKey(id).to_string();
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn test_error_display_incomplete_entry() {
        let err = Error::IncompleteEntry {
            offset: 12,
            have: 3,
            needed: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("need 4"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
