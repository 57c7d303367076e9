//! Document filters
//!
//! Equality matching follows document-store conventions:
//! - `{field: value}` matches when the field equals the value.
//! - When the field holds an array, it also matches if any element equals
//!   the value, so `Filter::eq("favoriteFoods", "burrito")` finds everyone
//!   who lists burrito among their foods.
//! - `Filter::eq(field, null)` also matches documents missing the field.

use folio_core::{Document, Value};

/// A predicate over documents
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document
    #[default]
    All,
    /// Field (dotted path) equals value, or array field contains value
    Eq {
        /// Field path
        field: String,
        /// Value to compare against
        value: Value,
    },
    /// Every sub-filter matches
    And(Vec<Filter>),
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Filter::All
    }

    /// Equality filter on a field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Combine with another filter; both must match
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// Whether the document satisfies this filter
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => match doc.lookup(field) {
                Some(actual) => value_matches(actual, value),
                None => value.is_null(),
            },
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

fn value_matches(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match actual {
        Value::Array(items) => items.iter().any(|item| item == expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::json;

    fn person() -> Document {
        Document::from_value(json!({
            "name": "Ana",
            "age": 28,
            "favoriteFoods": ["Sushi", "Pizza"],
            "address": {"city": "Lima"}
        }))
        .unwrap()
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(Filter::all().matches(&person()));
        assert!(Filter::all().matches(&Document::new()));
    }

    #[test]
    fn test_scalar_equality() {
        assert!(Filter::eq("name", "Ana").matches(&person()));
        assert!(!Filter::eq("name", "ana").matches(&person()));
        assert!(Filter::eq("age", 28).matches(&person()));
        assert!(!Filter::eq("age", "28").matches(&person()));
    }

    #[test]
    fn test_array_contains() {
        assert!(Filter::eq("favoriteFoods", "Pizza").matches(&person()));
        assert!(!Filter::eq("favoriteFoods", "burrito").matches(&person()));
    }

    #[test]
    fn test_whole_array_equality() {
        let exact = Filter::eq("favoriteFoods", json!(["Sushi", "Pizza"]));
        assert!(exact.matches(&person()));

        let reordered = Filter::eq("favoriteFoods", json!(["Pizza", "Sushi"]));
        assert!(!reordered.matches(&person()));
    }

    #[test]
    fn test_dotted_path() {
        assert!(Filter::eq("address.city", "Lima").matches(&person()));
        assert!(!Filter::eq("address.city", "Quito").matches(&person()));
    }

    #[test]
    fn test_null_matches_missing() {
        assert!(Filter::eq("nickname", Value::Null).matches(&person()));
        assert!(!Filter::eq("name", Value::Null).matches(&person()));
        assert!(!Filter::eq("nickname", "x").matches(&person()));
    }

    #[test]
    fn test_and_combinator() {
        let both = Filter::eq("name", "Ana").and(Filter::eq("favoriteFoods", "Sushi"));
        assert!(both.matches(&person()));

        let one_fails = Filter::eq("name", "Ana").and(Filter::eq("age", 99));
        assert!(!one_fails.matches(&person()));
    }

    #[test]
    fn test_and_flattens() {
        let f = Filter::eq("a", 1)
            .and(Filter::eq("b", 2))
            .and(Filter::eq("c", 3));
        assert!(matches!(&f, Filter::And(parts) if parts.len() == 3));

        assert_eq!(Filter::all().and(Filter::eq("a", 1)), Filter::eq("a", 1));
    }
}
