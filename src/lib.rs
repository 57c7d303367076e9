//! Folio - form echo server and embedded person document store
//!
//! Folio bundles two independent components:
//! - a form server ([`server`]) that echoes a submitted first and last name
//! - a person store ([`people`]) of one-shot operations over a `people`
//!   collection, backed by the embedded document store in [`engine`]
//!
//! # Quick Start
//!
//! ```ignore
//! use folio::people::StoreContext;
//!
//! let ctx = StoreContext::init("memory://")?;
//! let juan = ctx.people().create_and_save_person()?;
//! let found = ctx.people().find_person_by_id(&juan.id)?;
//! ctx.teardown()?;
//! ```

pub use folio_engine as engine;
pub use folio_people as people;
pub use folio_server as server;

pub use folio_core::{DocId, Document, Error, Result};
pub use folio_engine::{Collection, Database};
