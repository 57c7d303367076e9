//! Field projection for query results
//!
//! `Projection::parse` accepts the space-separated select syntax:
//! `"-age"` excludes `age`, `"name favoriteFoods"` keeps only those fields.
//! Inclusion and exclusion cannot be mixed, except that `-_id` may appear in
//! an inclusion list.

use folio_core::{Document, Error, Result, ID_FIELD};

/// Which fields to return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Keep only these fields (plus `_id` unless `exclude_id`)
    Include {
        /// Fields to keep
        fields: Vec<String>,
        /// Drop `_id` as well
        exclude_id: bool,
    },
    /// Drop these fields
    Exclude(Vec<String>),
}

impl Projection {
    /// Keep only the given fields and `_id`
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Include {
            fields: fields.into_iter().map(Into::into).collect(),
            exclude_id: false,
        }
    }

    /// Drop the given fields
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Parse select syntax such as `"-age"` or `"name -_id"`
    ///
    /// # Errors
    /// `Error::InvalidInput` for an empty spec or one that mixes inclusion
    /// and exclusion.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut included = Vec::new();
        let mut excluded = Vec::new();
        for token in spec.split_whitespace() {
            match token.strip_prefix('-') {
                Some("") => {
                    return Err(Error::invalid_input("projection has an empty field name"));
                }
                Some(field) => excluded.push(field.to_string()),
                None => included.push(token.to_string()),
            }
        }

        match (included.is_empty(), excluded.is_empty()) {
            (true, true) => Err(Error::invalid_input("projection is empty")),
            (true, false) => Ok(Projection::Exclude(excluded)),
            (false, true) => Ok(Projection::include(included)),
            (false, false) if excluded.iter().all(|f| f == ID_FIELD) => Ok(Projection::Include {
                fields: included,
                exclude_id: true,
            }),
            (false, false) => Err(Error::invalid_input(format!(
                "projection cannot mix inclusion and exclusion: '{}'",
                spec
            ))),
        }
    }

    /// Apply to a document
    pub fn apply(&self, mut doc: Document) -> Document {
        match self {
            Projection::Include { fields, exclude_id } => {
                doc.retain(|k| {
                    (k == ID_FIELD && !exclude_id) || fields.iter().any(|f| f == k)
                });
            }
            Projection::Exclude(fields) => {
                doc.retain(|k| !fields.iter().any(|f| f == k));
            }
        }
        doc
    }
}
