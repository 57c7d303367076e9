//! Core types for Folio
//!
//! This crate defines the foundational types shared by the store and the
//! person wrapper:
//! - DocId: Unique identifier assigned to every stored document
//! - Document: Schema-flexible JSON object stored in a collection
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod types;

pub use document::{Document, ID_FIELD};
pub use error::{Error, Result};
pub use types::DocId;

/// Re-exported so callers can build document values without a direct
/// `serde_json` dependency.
pub use serde_json::{json, Map, Value};
