//! Person collection wrapper for Folio
//!
//! Short one-shot functions over a single `people` collection:
//! - create one or many people
//! - find by name, by favorite food, by id
//! - edit-then-save, find-and-update, remove by id, remove many
//! - a chained query with sort, limit, and projection
//!
//! Every function performs exactly one store operation and returns the
//! store's error unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod model;
pub mod samples;
pub mod store;

pub use context::StoreContext;
pub use model::{person_schema, NewPerson, Person, COLLECTION};
pub use samples::{sample_people, sample_person};
pub use store::PersonStore;
