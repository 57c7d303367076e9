//! Collection schemas
//!
//! A [`Schema`] declares the fields of a collection's documents. Before a
//! write, [`Schema::prepare`] normalizes a document:
//! 1. array fields that are absent or null default to `[]`;
//! 2. in strict mode, undeclared fields are dropped;
//! 3. every declared field is type-checked, and required fields must be
//!    present and non-null.
//!
//! `_id` is always allowed and is checked by the store, not the schema.

use folio_core::document::type_name;
use folio_core::{Document, Error, Result, Value, ID_FIELD};

/// Declared type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string
    String,
    /// Whole number
    Integer,
    /// Any JSON number
    Number,
    /// JSON boolean
    Boolean,
    /// Array whose elements all have the given kind
    Array(Box<FieldKind>),
}

impl FieldKind {
    fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Array(inner) => format!("array of {}", inner.describe()),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Integer, Value::Number(n)) => n.is_i64(),
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Array(inner), Value::Array(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            _ => false,
        }
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Declared type
    pub kind: FieldKind,
    /// Whether the field must be present and non-null
    pub required: bool,
}

/// Field declarations for a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    strict: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Empty strict schema
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            strict: true,
        }
    }

    /// Declare a required field
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Declare an optional field
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    /// Keep undeclared fields instead of dropping them
    pub fn non_strict(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Declared fields
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Normalize and validate a document for writing
    ///
    /// # Errors
    /// `Error::Validation` naming the first offending field.
    pub fn prepare(&self, mut doc: Document) -> Result<Document> {
        for spec in &self.fields {
            let unset = matches!(doc.get(&spec.name), None | Some(Value::Null));
            if matches!(spec.kind, FieldKind::Array(_)) && unset {
                doc.insert(spec.name.clone(), Value::Array(Vec::new()));
            }
        }

        if self.strict {
            doc.retain(|k| k == ID_FIELD || self.spec(k).is_some());
        }

        self.validate(&doc)?;
        Ok(doc)
    }

    /// Validate without modifying
    ///
    /// # Errors
    /// `Error::Validation` naming the first offending field.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        for spec in &self.fields {
            match doc.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(Error::validation(
                            &spec.name,
                            format!("Path `{}` is required", spec.name),
                        ));
                    }
                }
                Some(value) => {
                    if !spec.kind.accepts(value) {
                        return Err(Error::validation(
                            &spec.name,
                            format!(
                                "expected {}, got {}",
                                spec.kind.describe(),
                                describe_value(value)
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Array(items) => match items.iter().find(|v| !v.is_string()) {
            Some(bad) => format!("array containing {}", type_name(bad)),
            None => "array".to_string(),
        },
        other => type_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::json;

    fn person_schema() -> Schema {
        Schema::new()
            .required("name", FieldKind::String)
            .optional("age", FieldKind::Integer)
            .optional("favoriteFoods", FieldKind::Array(Box::new(FieldKind::String)))
    }

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_document_passes() {
        let out = person_schema()
            .prepare(doc(json!({"name": "Ana", "age": 28, "favoriteFoods": ["Sushi"]})))
            .unwrap();
        assert_eq!(out.get("age"), Some(&json!(28)));
    }

    #[test]
    fn test_missing_required_field() {
        let err = person_schema().prepare(doc(json!({"age": 3}))).unwrap_err();
        assert!(matches!(err, Error::Validation { path, .. } if path == "name"));
    }

    #[test]
    fn test_null_required_field() {
        let err = person_schema()
            .prepare(doc(json!({"name": null})))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { path, .. } if path == "name"));
    }

    #[test]
    fn test_null_optional_field_allowed() {
        assert!(person_schema()
            .prepare(doc(json!({"name": "Ana", "age": null})))
            .is_ok());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = person_schema()
            .prepare(doc(json!({"name": "Ana", "age": "old"})))
            .unwrap_err();
        assert!(matches!(&err, Error::Validation { path, reason } if path == "age" && reason.contains("string")));

        let err = person_schema()
            .prepare(doc(json!({"name": "Ana", "age": 2.5})))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { path, .. } if path == "age"));

        let err = person_schema()
            .prepare(doc(json!({"name": "Ana", "favoriteFoods": ["ok", 3]})))
            .unwrap_err();
        assert!(matches!(&err, Error::Validation { path, reason } if path == "favoriteFoods" && reason.contains("number")));
    }

    #[test]
    fn test_array_defaults_to_empty() {
        let out = person_schema().prepare(doc(json!({"name": "Ana"}))).unwrap();
        assert_eq!(out.get("favoriteFoods"), Some(&json!([])));
        assert!(!out.contains_key("age"));
    }

    #[test]
    fn test_null_array_becomes_empty() {
        let out = person_schema()
            .prepare(doc(json!({"name": "Ana", "favoriteFoods": null})))
            .unwrap();
        assert_eq!(out.get("favoriteFoods"), Some(&json!([])));
    }

    #[test]
    fn test_integer_outside_i64_rejected() {
        let err = person_schema()
            .prepare(doc(json!({"name": "Ana", "age": u64::MAX})))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { path, .. } if path == "age"));

        let out = person_schema()
            .prepare(doc(json!({"name": "Ana", "age": i64::MAX})))
            .unwrap();
        assert_eq!(out.get("age"), Some(&json!(i64::MAX)));
    }

    #[test]
    fn test_strict_drops_unknown_fields() {
        let mut input = doc(json!({"name": "Ana", "nickname": "A"}));
        input.set_id(folio_core::DocId::new());
        let out = person_schema().prepare(input).unwrap();
        assert!(!out.contains_key("nickname"));
        assert!(out.contains_key("_id"));
    }

    #[test]
    fn test_non_strict_keeps_unknown_fields() {
        let out = person_schema()
            .non_strict()
            .prepare(doc(json!({"name": "Ana", "nickname": "A"})))
            .unwrap();
        assert_eq!(out.get("nickname"), Some(&json!("A")));
    }
}
