//! Store handle shared by every person operation
//!
//! A [`StoreContext`] owns the one database handle of a process. It is
//! created with [`StoreContext::init`] (or [`StoreContext::from_env`]),
//! passed to whoever needs the people store, and shut down with
//! [`StoreContext::teardown`].

use crate::store::PersonStore;
use folio_core::Result;
use folio_engine::Database;
use std::sync::Arc;
use tracing::info;

/// Environment variable holding the connection string
pub const URI_ENV: &str = "FOLIO_URI";

/// Connection string used when `FOLIO_URI` is unset
pub const DEFAULT_URI: &str = "memory://";

/// Database handle plus the people store bound to it
#[derive(Debug, Clone)]
pub struct StoreContext {
    db: Arc<Database>,
    people: PersonStore,
}

impl StoreContext {
    /// Connect to the store at `uri`
    ///
    /// # Errors
    /// Any error from `Database::connect`, returned unchanged.
    pub fn init(uri: &str) -> Result<Self> {
        let db = Database::connect(uri)?;
        info!(uri, durable = db.is_durable(), "Connected to store");
        let people = PersonStore::new(&db);
        Ok(Self { db, people })
    }

    /// Connect using `FOLIO_URI`, defaulting to an in-memory store
    pub fn from_env() -> Result<Self> {
        let uri = std::env::var(URI_ENV).unwrap_or_else(|_| DEFAULT_URI.to_string());
        Self::init(&uri)
    }

    /// The people store
    pub fn people(&self) -> &PersonStore {
        &self.people
    }

    /// The underlying database
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Flush and close the store
    ///
    /// Clones of this context see `Error::Closed` afterwards.
    pub fn teardown(self) -> Result<()> {
        self.db.close()?;
        info!("Store closed");
        Ok(())
    }
}
