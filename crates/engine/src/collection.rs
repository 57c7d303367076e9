//! Collection: named set of documents
//!
//! ## Design: STATELESS FACADE
//!
//! A Collection holds only `Arc<Database>`, its name, and an optional
//! schema. All data lives in the database's store. Multiple Collection
//! handles for the same name on the same Database see the same documents.
//!
//! ## Atomicity
//!
//! Every write method runs as one database transaction: it either fully
//! applies (and is logged as one record) or leaves no trace. Reads see the
//! latest committed state.
//!
//! ## Thread Safety
//!
//! Collection is `Send + Sync` and cheap to clone.

use crate::database::Database;
use crate::query::{Filter, Query, Update};
use crate::schema::Schema;
use folio_core::{DocId, Document, Result};
use std::sync::Arc;
use tracing::debug;

/// Which version of the document `find_one_and_update` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnDocument {
    /// The document as it was before the update
    #[default]
    Before,
    /// The document after the update was applied
    After,
}

/// Summary of a bulk delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Whether the store accepted the operation
    pub acknowledged: bool,
    /// Number of documents removed
    pub deleted_count: u64,
}

/// Handle to one collection of a database
#[derive(Clone)]
pub struct Collection {
    db: Arc<Database>,
    name: String,
    schema: Option<Arc<Schema>>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("schema", &self.schema.is_some())
            .finish()
    }
}

impl Collection {
    pub(crate) fn new(db: Arc<Database>, name: String, schema: Option<Schema>) -> Self {
        Self {
            db,
            name,
            schema: schema.map(Arc::new),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema applied to writes, if any
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Get the underlying database reference
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Assign an id when missing and run the schema
    fn prepare(&self, mut doc: Document) -> Result<(DocId, Document)> {
        let id = match doc.try_id()? {
            Some(id) => id,
            None => {
                let id = DocId::new();
                doc.set_id(id);
                id
            }
        };
        let doc = match &self.schema {
            Some(schema) => schema.prepare(doc)?,
            None => doc,
        };
        Ok((id, doc))
    }

    // ========================================================================
    // Inserts
    // ========================================================================

    /// Insert one document
    ///
    /// Assigns `_id` when absent. Returns the stored document.
    ///
    /// # Errors
    /// - `Error::InvalidId` if `_id` is present but malformed
    /// - `Error::Validation` if the schema rejects the document
    /// - `Error::DuplicateKey` if the id is already taken
    pub fn insert_one(&self, doc: Document) -> Result<Document> {
        let (id, doc) = self.prepare(doc)?;
        let stored = self
            .db
            .transaction(|txn| txn.insert(&self.name, id, doc))?;
        debug!(collection = %self.name, id = %id, "Inserted document");
        Ok(stored.body)
    }

    /// Insert many documents in one atomic batch
    ///
    /// Every document is prepared before anything is written; if any
    /// document is rejected, nothing is inserted. Returns the stored
    /// documents in input order.
    pub fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Document>> {
        let prepared = docs
            .into_iter()
            .map(|doc| self.prepare(doc))
            .collect::<Result<Vec<_>>>()?;

        let stored = self.db.transaction(|txn| {
            let mut out = Vec::with_capacity(prepared.len());
            for (id, doc) in prepared {
                out.push(txn.insert(&self.name, id, doc)?.body);
            }
            Ok(out)
        })?;
        debug!(collection = %self.name, count = stored.len(), "Inserted documents");
        Ok(stored)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All documents matching the filter, in natural order
    pub fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        self.db.read(|state| {
            state
                .collection(&self.name)
                .map(|c| {
                    c.iter()
                        .filter(|d| filter.matches(&d.body))
                        .map(|d| d.body.clone())
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// First matching document in natural order
    pub fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        self.db.read(|state| {
            state.collection(&self.name).and_then(|c| {
                c.iter()
                    .find(|d| filter.matches(&d.body))
                    .map(|d| d.body.clone())
            })
        })
    }

    /// Document with the given id
    pub fn find_by_id(&self, id: &DocId) -> Result<Option<Document>> {
        self.db.read(|state| {
            state
                .collection(&self.name)
                .and_then(|c| c.get(id))
                .map(|d| d.body.clone())
        })
    }

    /// Number of matching documents
    pub fn count(&self, filter: &Filter) -> Result<u64> {
        self.db.read(|state| {
            state
                .collection(&self.name)
                .map(|c| match filter {
                    Filter::All => c.len() as u64,
                    _ => c.iter().filter(|d| filter.matches(&d.body)).count() as u64,
                })
                .unwrap_or(0)
        })
    }

    /// Start a chained query
    pub fn query(&self, filter: Filter) -> Query {
        Query::new(self.clone(), filter)
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Replace the stored document that has the same `_id`
    ///
    /// # Errors
    /// - `Error::InvalidInput` if the document has no `_id`
    /// - `Error::DocumentNotFound` if no stored document has that id
    /// - `Error::Validation` if the schema rejects the document
    pub fn save(&self, doc: Document) -> Result<Document> {
        let id = doc
            .try_id()?
            .ok_or_else(|| folio_core::Error::invalid_input("cannot save a document without _id"))?;
        let (_, doc) = self.prepare(doc)?;
        let stored = self
            .db
            .transaction(|txn| txn.replace(&self.name, id, doc))?;
        debug!(collection = %self.name, id = %id, version = stored.version, "Saved document");
        Ok(stored.body)
    }

    /// Update the first matching document
    ///
    /// Returns `None` when nothing matches; otherwise the document before or
    /// after the update, as chosen by `returning`.
    pub fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
        returning: ReturnDocument,
    ) -> Result<Option<Document>> {
        let result = self.db.transaction(|txn| {
            let Some(id) = txn.matching_ids(&self.name, |d| filter.matches(d)).first().copied()
            else {
                return Ok(None);
            };
            let before = match txn.get(&self.name, &id) {
                Some(doc) => doc.body.clone(),
                None => return Ok(None),
            };

            let mut after = before.clone();
            update.apply(&mut after)?;
            let after = match &self.schema {
                Some(schema) => schema.prepare(after)?,
                None => after,
            };
            let stored = txn.replace(&self.name, id, after)?;

            Ok(Some(match returning {
                ReturnDocument::Before => before,
                ReturnDocument::After => stored.body,
            }))
        })?;
        debug!(collection = %self.name, matched = result.is_some(), "Find one and update");
        Ok(result)
    }

    // ========================================================================
    // Deletes
    // ========================================================================

    /// Remove the document with the given id, returning it
    pub fn find_by_id_and_remove(&self, id: &DocId) -> Result<Option<Document>> {
        let removed = self
            .db
            .transaction(|txn| Ok(txn.delete(&self.name, id)))?;
        debug!(collection = %self.name, id = %id, removed = removed.is_some(), "Remove by id");
        Ok(removed.map(|d| d.body))
    }

    /// Remove every matching document
    pub fn delete_many(&self, filter: &Filter) -> Result<DeleteResult> {
        let deleted = self.db.transaction(|txn| {
            let ids = txn.matching_ids(&self.name, |d| filter.matches(d));
            let mut deleted = 0u64;
            for id in &ids {
                if txn.delete(&self.name, id).is_some() {
                    deleted += 1;
                }
            }
            Ok(deleted)
        })?;
        debug!(collection = %self.name, deleted, "Deleted documents");
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }
}
