//! Core types for Folio
//!
//! - DocId: Unique identifier for stored documents

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a stored document
///
/// A DocId is a wrapper around a UUID v4. It is assigned by the store when a
/// document is inserted without one, and is written into the document's
/// `_id` field as the hyphenated string form.
///
/// DocIds always serialize as strings, in both human-readable and binary
/// formats, so a document's `_id` looks the same in JSON responses and in
/// the write-ahead log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(Uuid);

impl DocId {
    /// Create a new random DocId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a DocId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a DocId from its string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    ///
    /// # Errors
    /// Returns `Error::InvalidId` if the string is not a valid id.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }

    /// Get the raw bytes of this DocId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_unique() {
        let a = DocId::new();
        let b = DocId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_doc_id_display_parse_roundtrip() {
        let id = DocId::new();
        let parsed: DocId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_doc_id_parse_invalid() {
        let err = DocId::parse("not-an-id").unwrap_err();
        assert!(matches!(err, Error::InvalidId(s) if s == "not-an-id"));
    }

    #[test]
    fn test_doc_id_serializes_as_string() {
        let id = DocId::from_bytes([7u8; 16]);
        let value = serde_json::to_value(id).unwrap();
        assert_eq!(value, serde_json::Value::String(id.to_string()));

        let back: DocId = serde_json::from_value(value).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_doc_id_deserialize_rejects_garbage() {
        let result: std::result::Result<DocId, _> = serde_json::from_str("\"zzz\"");
        assert!(result.is_err());
    }
}
