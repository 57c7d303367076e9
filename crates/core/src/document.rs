//! Document: the schema-flexible record stored in a collection
//!
//! A document is a JSON object. The reserved `_id` field holds the
//! document's [`DocId`] as a string once the document has been stored.
//! Typed records convert to and from documents through serde.

use crate::error::{Error, Result};
use crate::types::DocId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding the document identifier
pub const ID_FIELD: &str = "_id";

/// A JSON object stored in a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a document from a JSON value
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::invalid_input(format!(
                "document must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Serialize any serde value into a document
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Deserialize the document into a typed record
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.0))?)
    }

    /// Read the `_id` field
    ///
    /// Returns `Ok(None)` when the field is absent.
    ///
    /// # Errors
    /// Returns `Error::InvalidId` if `_id` is present but is not a valid id string.
    pub fn try_id(&self) -> Result<Option<DocId>> {
        match self.0.get(ID_FIELD) {
            None => Ok(None),
            Some(Value::String(s)) => DocId::parse(s).map(Some),
            Some(other) => Err(Error::InvalidId(other.to_string())),
        }
    }

    /// The document id, if present and valid
    pub fn id(&self) -> Option<DocId> {
        self.try_id().ok().flatten()
    }

    /// Set the `_id` field
    pub fn set_id(&mut self, id: DocId) {
        self.0
            .insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    }

    /// Get a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a mutable reference to a top-level field
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Look up a dotted path such as `address.city`
    ///
    /// Each segment descends into an object; a missing segment yields `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Insert or overwrite a top-level field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a top-level field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Whether a top-level field is present
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over top-level fields
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Keep only the fields for which the predicate returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|k, _| keep(k));
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

/// Human-readable JSON type name for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
