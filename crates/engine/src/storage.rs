//! In-memory document storage
//!
//! Documents live in per-collection maps keyed by an insertion sequence
//! number, so iteration yields natural (insertion) order. A side index maps
//! each `DocId` to its sequence number. Replacing a document keeps its
//! sequence number; only inserts allocate new ones.

use chrono::Utc;
use folio_core::{DocId, Document};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A document plus store metadata
///
/// The metadata never appears in documents returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDoc {
    /// Document identifier (mirrors the body's `_id`)
    pub id: DocId,
    /// The document body, including `_id`
    pub body: Document,
    /// Document version (increments on every replace)
    pub version: u64,
    /// Creation timestamp (microseconds since epoch)
    pub created_at: i64,
    /// Last modification timestamp (microseconds since epoch)
    pub updated_at: i64,
}

impl StoredDoc {
    /// Wrap a body for first insertion at version 1
    pub fn new(id: DocId, body: Document) -> Self {
        let now = now_micros();
        StoredDoc {
            id,
            body,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Produce the successor of this document with a new body
    pub fn successor(&self, body: Document) -> Self {
        StoredDoc {
            id: self.id,
            body,
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: now_micros(),
        }
    }
}

pub(crate) fn now_micros() -> i64 {
    Utc::now().timestamp_micros()
}

/// Storage for a single collection
#[derive(Debug, Default)]
pub(crate) struct CollectionData {
    docs: BTreeMap<u64, StoredDoc>,
    index: HashMap<DocId, u64>,
    next_seq: u64,
}

impl CollectionData {
    pub(crate) fn get(&self, id: &DocId) -> Option<&StoredDoc> {
        self.index.get(id).and_then(|seq| self.docs.get(seq))
    }

    pub(crate) fn contains(&self, id: &DocId) -> bool {
        self.index.contains_key(id)
    }

    /// Documents in natural order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &StoredDoc> {
        self.docs.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.len()
    }

    /// Append a new document, returning its sequence number
    pub(crate) fn insert(&mut self, doc: StoredDoc) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.insert_at(seq, doc);
        seq
    }

    /// Place a document at a known sequence number (used by rollback)
    pub(crate) fn insert_at(&mut self, seq: u64, doc: StoredDoc) {
        self.index.insert(doc.id, seq);
        self.docs.insert(seq, doc);
        if seq >= self.next_seq {
            self.next_seq = seq + 1;
        }
    }

    /// Replace an existing document in place, returning the old one
    pub(crate) fn replace(&mut self, doc: StoredDoc) -> Option<StoredDoc> {
        let seq = *self.index.get(&doc.id)?;
        self.docs.insert(seq, doc)
    }

    /// Remove a document, returning its sequence number and value
    pub(crate) fn remove(&mut self, id: &DocId) -> Option<(u64, StoredDoc)> {
        let seq = self.index.remove(id)?;
        self.docs.remove(&seq).map(|doc| (seq, doc))
    }
}

/// All collections of a database
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    collections: HashMap<String, CollectionData>,
}

impl StoreState {
    pub(crate) fn collection(&self, name: &str) -> Option<&CollectionData> {
        self.collections.get(name)
    }

    pub(crate) fn collection_mut(&mut self, name: &str) -> &mut CollectionData {
        self.collections.entry(name.to_string()).or_default()
    }

    /// Names of collections holding at least one document, sorted
    pub(crate) fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|(_, data)| data.len() > 0)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}
