//! Write transactions over the in-memory store
//!
//! A [`Transaction`] applies changes to the store state immediately while
//! recording two things: the [`Mutation`]s to append to the write-ahead log,
//! and an undo log. If the closure driving the transaction fails, or the log
//! append fails, the undo log is replayed in reverse so the state is exactly
//! what it was before the transaction began.

use crate::storage::{StoreState, StoredDoc};
use folio_core::{DocId, Document, Error, Result};
use serde::{Deserialize, Serialize};

/// A committed change, as recorded in the write-ahead log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// A new document was appended to a collection
    Insert {
        /// Collection name
        collection: String,
        /// The stored document
        doc: StoredDoc,
    },
    /// An existing document was replaced in place
    Replace {
        /// Collection name
        collection: String,
        /// The new stored document
        doc: StoredDoc,
    },
    /// A document was removed
    Delete {
        /// Collection name
        collection: String,
        /// Id of the removed document
        id: DocId,
    },
}

impl Mutation {
    /// Apply this mutation to the state (used by log replay)
    pub(crate) fn apply(self, state: &mut StoreState) {
        match self {
            Mutation::Insert { collection, doc } => {
                let data = state.collection_mut(&collection);
                if data.contains(&doc.id) {
                    data.replace(doc);
                } else {
                    data.insert(doc);
                }
            }
            Mutation::Replace { collection, doc } => {
                state.collection_mut(&collection).replace(doc);
            }
            Mutation::Delete { collection, id } => {
                state.collection_mut(&collection).remove(&id);
            }
        }
    }
}

enum Undo {
    Remove { collection: String, id: DocId },
    Restore { collection: String, doc: StoredDoc },
    Reinsert { collection: String, seq: u64, doc: StoredDoc },
}

/// An open write transaction
pub(crate) struct Transaction<'a> {
    state: &'a mut StoreState,
    mutations: Vec<Mutation>,
    undo: Vec<Undo>,
}

/// Undo log handed back when a transaction finishes
pub(crate) struct UndoLog(Vec<Undo>);

impl<'a> Transaction<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self {
            state,
            mutations: Vec::new(),
            undo: Vec::new(),
        }
    }

    pub(crate) fn get(&self, collection: &str, id: &DocId) -> Option<&StoredDoc> {
        self.state.collection(collection).and_then(|c| c.get(id))
    }

    /// Ids of documents in natural order for which `pred` holds
    pub(crate) fn matching_ids(
        &self,
        collection: &str,
        mut pred: impl FnMut(&Document) -> bool,
    ) -> Vec<DocId> {
        self.state
            .collection(collection)
            .map(|c| c.iter().filter(|d| pred(&d.body)).map(|d| d.id).collect())
            .unwrap_or_default()
    }

    /// Append a new document
    ///
    /// # Errors
    /// `Error::DuplicateKey` if a document with the same id already exists.
    pub(crate) fn insert(&mut self, collection: &str, id: DocId, body: Document) -> Result<StoredDoc> {
        let data = self.state.collection_mut(collection);
        if data.contains(&id) {
            return Err(Error::DuplicateKey(id));
        }
        let doc = StoredDoc::new(id, body);
        data.insert(doc.clone());

        self.undo.push(Undo::Remove {
            collection: collection.to_string(),
            id,
        });
        self.mutations.push(Mutation::Insert {
            collection: collection.to_string(),
            doc: doc.clone(),
        });
        Ok(doc)
    }

    /// Replace the body of an existing document
    ///
    /// # Errors
    /// `Error::DocumentNotFound` if no document has this id.
    pub(crate) fn replace(&mut self, collection: &str, id: DocId, body: Document) -> Result<StoredDoc> {
        let data = self.state.collection_mut(collection);
        let next = match data.get(&id) {
            Some(current) => current.successor(body),
            None => return Err(Error::DocumentNotFound(id)),
        };
        let previous = data
            .replace(next.clone())
            .ok_or(Error::DocumentNotFound(id))?;

        self.undo.push(Undo::Restore {
            collection: collection.to_string(),
            doc: previous,
        });
        self.mutations.push(Mutation::Replace {
            collection: collection.to_string(),
            doc: next.clone(),
        });
        Ok(next)
    }

    /// Remove a document, returning it if it existed
    pub(crate) fn delete(&mut self, collection: &str, id: &DocId) -> Option<StoredDoc> {
        let (seq, removed) = self.state.collection_mut(collection).remove(id)?;

        self.undo.push(Undo::Reinsert {
            collection: collection.to_string(),
            seq,
            doc: removed.clone(),
        });
        self.mutations.push(Mutation::Delete {
            collection: collection.to_string(),
            id: *id,
        });
        Some(removed)
    }

    /// Finish the transaction, releasing the borrow on the state
    pub(crate) fn into_parts(self) -> (Vec<Mutation>, UndoLog) {
        (self.mutations, UndoLog(self.undo))
    }
}

impl UndoLog {
    /// Revert every change recorded in this log, newest first
    pub(crate) fn rollback(self, state: &mut StoreState) {
        for undo in self.0.into_iter().rev() {
            match undo {
                Undo::Remove { collection, id } => {
                    state.collection_mut(&collection).remove(&id);
                }
                Undo::Restore { collection, doc } => {
                    state.collection_mut(&collection).replace(doc);
                }
                Undo::Reinsert {
                    collection,
                    seq,
                    doc,
                } => {
                    state.collection_mut(&collection).insert_at(seq, doc);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(name: &str, id: DocId) -> Document {
        let mut doc = Document::from_value(json!({ "name": name })).unwrap();
        doc.set_id(id);
        doc
    }

    fn names(state: &StoreState) -> Vec<String> {
        state
            .collection("people")
            .map(|c| {
                c.iter()
                    .map(|d| d.body.get("name").unwrap().as_str().unwrap().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_insert_records_mutation() {
        let mut state = StoreState::default();
        let id = DocId::new();

        let mut txn = Transaction::new(&mut state);
        txn.insert("people", id, body("Ana", id)).unwrap();
        let (mutations, _undo) = txn.into_parts();

        assert_eq!(mutations.len(), 1);
        assert!(matches!(&mutations[0], Mutation::Insert { doc, .. } if doc.id == id));
        assert_eq!(names(&state), vec!["Ana"]);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut state = StoreState::default();
        let id = DocId::new();

        let mut txn = Transaction::new(&mut state);
        txn.insert("people", id, body("Ana", id)).unwrap();
        let err = txn.insert("people", id, body("Ana again", id)).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(dup) if dup == id));
    }

    #[test]
    fn test_replace_missing_is_not_found() {
        let mut state = StoreState::default();
        let id = DocId::new();

        let mut txn = Transaction::new(&mut state);
        let err = txn.replace("people", id, body("Ghost", id)).unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }

    #[test]
    fn test_rollback_restores_everything() {
        let mut state = StoreState::default();
        let keep = DocId::new();
        let edit = DocId::new();
        let drop_id = DocId::new();
        {
            let mut txn = Transaction::new(&mut state);
            txn.insert("people", keep, body("keep", keep)).unwrap();
            txn.insert("people", edit, body("edit", edit)).unwrap();
            txn.insert("people", drop_id, body("drop", drop_id)).unwrap();
            txn.into_parts();
        }
        let before = names(&state);

        let mut txn = Transaction::new(&mut state);
        txn.replace("people", edit, body("edited", edit)).unwrap();
        txn.delete("people", &drop_id).unwrap();
        let new_id = DocId::new();
        txn.insert("people", new_id, body("new", new_id)).unwrap();
        let (_mutations, undo) = txn.into_parts();
        assert_eq!(names(&state), vec!["keep", "edited", "new"]);

        undo.rollback(&mut state);
        assert_eq!(names(&state), before);
        assert_eq!(
            state.collection("people").unwrap().get(&edit).unwrap().version,
            1
        );
    }

    #[test]
    fn test_mutation_apply_replays_changes() {
        let mut source = StoreState::default();
        let id = DocId::new();
        let mutations = {
            let mut txn = Transaction::new(&mut source);
            txn.insert("people", id, body("Ana", id)).unwrap();
            txn.replace("people", id, body("Ana B", id)).unwrap();
            txn.into_parts().0
        };

        let mut replica = StoreState::default();
        for m in mutations {
            m.apply(&mut replica);
        }
        assert_eq!(names(&replica), vec!["Ana B"]);
        assert_eq!(replica.collection("people").unwrap().get(&id).unwrap().version, 2);
    }
}
