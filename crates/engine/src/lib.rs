//! Embedded document store for Folio
//!
//! This crate provides:
//! - Database: open/connect/close, log replay, the transaction closure
//! - Collection: insert, find, update, and delete over schema-flexible documents
//! - Query: filters, updates, projections, and chained find with sort and limit
//! - Schema: optional per-collection field declarations
//!
//! Durable databases keep their state in memory and append every committed
//! transaction to a write-ahead log; opening the database replays the log.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod database;
pub mod query;
pub mod schema;
pub mod storage;
pub mod transaction;
pub mod wal;

pub use collection::{Collection, DeleteResult, ReturnDocument};
pub use database::{ConnectionString, Database, DurabilityMode, FolioConfig};
pub use query::{Filter, Projection, Query, SortOrder, Update, UpdateOp};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use storage::StoredDoc;
pub use transaction::Mutation;
