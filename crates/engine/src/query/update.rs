//! Update descriptions for `find_one_and_update`
//!
//! An [`Update`] is an ordered list of field operations applied to a copy of
//! the matched document. `_id` is immutable.

use folio_core::document::type_name;
use folio_core::{Document, Error, Result, Value, ID_FIELD};

/// One field operation
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Overwrite (or create) a field
    Set(String, Value),
    /// Remove a field
    Unset(String),
    /// Append to an array field, creating it when absent
    Push(String, Value),
}

/// An ordered set of field operations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    /// Empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a field
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Set(field.into(), value.into()));
        self
    }

    /// Remove a field
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.ops.push(UpdateOp::Unset(field.into()));
        self
    }

    /// Append a value to an array field
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Push(field.into(), value.into()));
        self
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every operation to the document
    ///
    /// # Errors
    /// - `Error::InvalidInput` when an operation targets `_id`.
    /// - `Error::InvalidInput` when pushing onto a field that is not an array.
    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        for op in &self.ops {
            match op {
                UpdateOp::Set(field, value) => {
                    guard_id(field)?;
                    doc.insert(field.clone(), value.clone());
                }
                UpdateOp::Unset(field) => {
                    guard_id(field)?;
                    doc.remove(field);
                }
                UpdateOp::Push(field, value) => {
                    guard_id(field)?;
                    match doc.get_mut(field) {
                        Some(Value::Array(items)) => items.push(value.clone()),
                        Some(other) => {
                            return Err(Error::invalid_input(format!(
                                "cannot push to field '{}' of type {}",
                                field,
                                type_name(other)
                            )))
                        }
                        None => {
                            doc.insert(field.clone(), Value::Array(vec![value.clone()]));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn guard_id(field: &str) -> Result<()> {
    if field == ID_FIELD {
        return Err(Error::invalid_input(
            "performing an update on the path '_id' would modify the immutable field '_id'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{json, DocId};

    fn doc() -> Document {
        let mut d = Document::from_value(json!({
            "name": "Mary",
            "age": 31,
            "favoriteFoods": ["soup"]
        }))
        .unwrap();
        d.set_id(DocId::new());
        d
    }

    #[test]
    fn test_set_overwrites_and_creates() {
        let mut d = doc();
        Update::new().set("age", 20).set("city", "Quito").apply(&mut d).unwrap();
        assert_eq!(d.get("age"), Some(&json!(20)));
        assert_eq!(d.get("city"), Some(&json!("Quito")));
    }

    #[test]
    fn test_unset_removes() {
        let mut d = doc();
        Update::new().unset("age").apply(&mut d).unwrap();
        assert!(!d.contains_key("age"));
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut d = doc();
        Update::new()
            .push("favoriteFoods", "hamburger")
            .push("favoriteFoods", "soup")
            .apply(&mut d)
            .unwrap();
        assert_eq!(
            d.get("favoriteFoods"),
            Some(&json!(["soup", "hamburger", "soup"]))
        );
    }

    #[test]
    fn test_push_creates_missing_array() {
        let mut d = doc();
        Update::new().push("tags", "new").apply(&mut d).unwrap();
        assert_eq!(d.get("tags"), Some(&json!(["new"])));
    }

    #[test]
    fn test_push_onto_scalar_fails() {
        let mut d = doc();
        let err = Update::new().push("name", "x").apply(&mut d).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("string")));
    }

    #[test]
    fn test_id_is_immutable() {
        let mut d = doc();
        let id = d.id();
        let err = Update::new().set("_id", "other").apply(&mut d).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(d.id(), id);
    }
}
