//! Person record and its collection schema

use folio_core::{DocId, Document, Result};
use folio_engine::{FieldKind, Schema};
use serde::{Deserialize, Serialize};

/// Collection holding every person
pub const COLLECTION: &str = "people";

/// A stored person
///
/// Field names on the wire follow the document layout: `_id`, `name`,
/// `age`, `favoriteFoods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Identifier assigned by the store
    #[serde(rename = "_id")]
    pub id: DocId,
    /// Full name
    pub name: String,
    /// Age in years; absent when never set or projected away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    /// Favorite foods in the order they were added
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    pub(crate) fn from_document(doc: Document) -> Result<Self> {
        doc.into_typed()
    }

    pub(crate) fn to_document(&self) -> Result<Document> {
        Document::from_serializable(self)
    }
}

/// A person that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    /// Full name
    pub name: String,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    /// Favorite foods
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    /// Person with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    /// Set the age
    pub fn age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    /// Set the favorite foods
    pub fn favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn to_document(&self) -> Result<Document> {
        Document::from_serializable(self)
    }
}

/// Schema applied to every write of the people collection
///
/// `name` is a required string, `age` an optional integer, and
/// `favoriteFoods` an optional array of strings that defaults to `[]`.
pub fn person_schema() -> Schema {
    Schema::new()
        .required("name", FieldKind::String)
        .optional("age", FieldKind::Integer)
        .optional(
            "favoriteFoods",
            FieldKind::Array(Box::new(FieldKind::String)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::json;

    #[test]
    fn test_person_uses_document_field_names() {
        let id = DocId::new();
        let person = Person {
            id,
            name: "Ana".into(),
            age: Some(28),
            favorite_foods: vec!["Sushi".into()],
        };
        let doc = person.to_document().unwrap();
        assert_eq!(doc.id(), Some(id));
        assert_eq!(doc.get("favoriteFoods"), Some(&json!(["Sushi"])));
        assert_eq!(Person::from_document(doc).unwrap(), person);
    }

    #[test]
    fn test_missing_age_and_foods_deserialize() {
        let id = DocId::new();
        let doc = Document::from_value(json!({"_id": id.to_string(), "name": "Ana"})).unwrap();
        let person = Person::from_document(doc).unwrap();
        assert_eq!(person.age, None);
        assert!(person.favorite_foods.is_empty());
    }

    #[test]
    fn test_new_person_omits_unset_age() {
        let doc = NewPerson::new("Bo").to_document().unwrap();
        assert!(!doc.contains_key("age"));
        assert!(doc.id().is_none());
    }

    #[test]
    fn test_schema_rejects_nameless_person() {
        let doc = Document::from_value(json!({"age": 3})).unwrap();
        assert!(person_schema().prepare(doc).is_err());
    }
}
