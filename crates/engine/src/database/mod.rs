//! Database struct and open/close logic
//!
//! This module provides the main Database struct that orchestrates:
//! - Store initialization
//! - Log replay on open
//! - The transaction closure used by every collection write
//!
//! ## Persistence
//!
//! | Constructor              | Files | Data after drop |
//! |--------------------------|-------|-----------------|
//! | `Database::ephemeral()`  | none  | lost            |
//! | `Database::open(dir)`    | `folio.toml`, `folio.wal` | kept |
//! | `Database::connect(uri)` | per the connection string | |
//!
//! ## Transaction API
//!
//! `db.transaction(|txn| { ... })` applies changes immediately under the
//! store's write lock. On success the recorded mutations are appended to the
//! log as one commit record; if the closure fails or the append fails, every
//! change is undone before the lock is released.

pub mod config;
mod registry;
pub mod uri;

pub use config::{DurabilityMode, FolioConfig, CONFIG_FILE_NAME};
pub use registry::OPEN_DATABASES;
pub use uri::ConnectionString;

use crate::collection::Collection;
use crate::schema::Schema;
use crate::storage::{now_micros, StoreState};
use crate::transaction::Transaction;
use crate::wal::{read_wal, truncate_wal, WalEntry, WalWriter, WAL_FILE_NAME};
use folio_core::{Error, Result};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An embedded document database
///
/// Always handled through `Arc<Database>`; collections keep a clone of the
/// Arc. Durable databases are unique per data directory within a process.
pub struct Database {
    state: RwLock<StoreState>,
    wal: Option<Mutex<WalWriter>>,
    data_dir: Option<PathBuf>,
    config: FolioConfig,
    closed: AtomicBool,
    next_txn: AtomicU64,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("durability", &self.config.durability)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Database {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an in-memory database with no files
    pub fn ephemeral() -> Arc<Self> {
        debug!(target: "folio::db", "Opened ephemeral database");
        Arc::new(Self {
            state: RwLock::new(StoreState::default()),
            wal: None,
            data_dir: None,
            config: FolioConfig::default(),
            closed: AtomicBool::new(false),
            next_txn: AtomicU64::new(1),
        })
    }

    /// Open from a connection string such as `memory://` or `folio://./data`
    ///
    /// # Errors
    /// `Error::InvalidInput` for a malformed string, plus any error from
    /// [`Database::open`].
    pub fn connect(uri: &str) -> Result<Arc<Self>> {
        match ConnectionString::parse(uri)? {
            ConnectionString::Memory => Ok(Self::ephemeral()),
            ConnectionString::Path(path) => Self::open(path),
        }
    }

    /// Open (or create) a durable database in the given directory
    ///
    /// Writes a default `folio.toml` on first open and reads settings from
    /// it. The log is replayed into memory before this returns.
    ///
    /// # Errors
    /// - I/O errors creating the directory or reading files
    /// - `Error::InvalidInput` for an unreadable `folio.toml`
    /// - `Error::Corruption` if a log record fails its checksum
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        FolioConfig::write_default_if_missing(&config_path)?;
        let cfg = FolioConfig::from_file(&config_path)?;

        Self::open_inner(&data_dir, cfg)
    }

    /// Open with an explicit configuration
    ///
    /// The supplied config is written to `folio.toml` so a later
    /// [`Database::open`] picks up the same settings.
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: FolioConfig) -> Result<Arc<Self>> {
        cfg.durability_mode()?;
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;

        Self::open_inner(&data_dir, cfg)
    }

    fn open_inner(data_dir: &Path, cfg: FolioConfig) -> Result<Arc<Self>> {
        let mode = cfg.durability_mode()?;
        let canonical = data_dir.canonicalize()?;

        // Declared before the registry guard so it is dropped after it;
        // dropping the last handle re-enters the registry.
        let mut stale: Option<Arc<Database>> = None;
        let mut registry = OPEN_DATABASES.lock();

        if let Some(existing) = registry.get(&canonical).and_then(|w| w.upgrade()) {
            if !existing.is_closed() {
                info!(target: "folio::db", path = ?canonical, "Returning existing database instance");
                return Ok(existing);
            }
            stale = Some(existing);
        }

        let wal_path = canonical.join(WAL_FILE_NAME);
        let replay = read_wal(&wal_path)?;
        if replay.torn_tail {
            warn!(
                target: "folio::db",
                path = ?wal_path,
                valid_len = replay.valid_len,
                "Log ends with an incomplete record; truncating to the last complete commit"
            );
            truncate_wal(&wal_path, replay.valid_len)?;
        }

        let mut state = StoreState::default();
        let mut last_txn = 0u64;
        let mut commits = 0usize;
        let mut applied = 0usize;
        for entry in replay.entries {
            match entry {
                WalEntry::Commit {
                    txn_id, mutations, ..
                } => {
                    last_txn = last_txn.max(txn_id);
                    commits += 1;
                    applied += mutations.len();
                    for mutation in mutations {
                        mutation.apply(&mut state);
                    }
                }
            }
        }

        info!(
            target: "folio::db",
            path = ?canonical,
            commits,
            mutations = applied,
            durability = %cfg.durability,
            "Recovery complete"
        );

        let writer = WalWriter::open(&wal_path, mode)?;
        let db = Arc::new(Self {
            state: RwLock::new(state),
            wal: Some(Mutex::new(writer)),
            data_dir: Some(canonical.clone()),
            config: cfg,
            closed: AtomicBool::new(false),
            next_txn: AtomicU64::new(last_txn + 1),
        });
        registry.insert(canonical, Arc::downgrade(&db));
        drop(registry);
        drop(stale);
        Ok(db)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Handle to a collection; collections exist once written to
    pub fn collection(self: &Arc<Self>, name: impl Into<String>) -> Collection {
        Collection::new(Arc::clone(self), name.into(), None)
    }

    /// Handle to a collection whose writes are checked against `schema`
    pub fn collection_with_schema(
        self: &Arc<Self>,
        name: impl Into<String>,
        schema: Schema,
    ) -> Collection {
        Collection::new(Arc::clone(self), name.into(), Some(schema))
    }

    /// Names of collections that hold data, sorted
    pub fn collection_names(&self) -> Result<Vec<String>> {
        self.read(|state| state.collection_names())
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Run `f` as one atomic write
    ///
    /// Commit on `Ok`, undo on `Err`. Commits with no changes are not logged.
    pub(crate) fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T>,
    {
        self.ensure_open()?;
        let mut state = self.state.write();
        // close() may have won the lock while we waited.
        self.ensure_open()?;

        let mut txn = Transaction::new(&mut state);
        let outcome = f(&mut txn);
        let (mutations, undo) = txn.into_parts();

        let value = match outcome {
            Ok(value) => value,
            Err(e) => {
                undo.rollback(&mut state);
                return Err(e);
            }
        };

        if let Some(wal) = &self.wal {
            if !mutations.is_empty() {
                let entry = WalEntry::Commit {
                    txn_id: self.next_txn.fetch_add(1, Ordering::SeqCst),
                    timestamp: now_micros(),
                    mutations,
                };
                if let Err(e) = wal.lock().append(&entry) {
                    warn!(target: "folio::db", error = %e, "Log append failed; rolling back");
                    undo.rollback(&mut state);
                    return Err(e);
                }
            }
        }
        Ok(value)
    }

    /// Run `f` against a consistent snapshot of the store
    pub(crate) fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreState) -> T,
    {
        self.ensure_open()?;
        let state = self.state.read();
        self.ensure_open()?;
        Ok(f(&state))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Force the log to disk; a no-op for ephemeral databases
    pub fn flush(&self) -> Result<()> {
        if let Some(wal) = &self.wal {
            wal.lock().flush()?;
        }
        Ok(())
    }

    /// Flush and stop accepting operations
    ///
    /// Idempotent. Later operations through any handle fail with
    /// `Error::Closed`.
    pub fn close(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }
        // Wait out an in-flight write before flushing.
        let _guard = self.state.write();
        self.flush()?;
        self.closed.store(true, Ordering::SeqCst);
        self.unregister();
        info!(target: "folio::db", path = ?self.data_dir, "Database closed");
        Ok(())
    }

    fn unregister(&self) {
        if let Some(dir) = &self.data_dir {
            let mut registry = OPEN_DATABASES.lock();
            let ours = registry
                .get(dir)
                .map_or(false, |w| std::ptr::eq(w.as_ptr(), self));
            if ours {
                registry.remove(dir);
            }
        }
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether writes reach a log on disk
    pub fn is_durable(&self) -> bool {
        self.wal.is_some()
    }

    /// Data directory of a durable database
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Active configuration
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if !self.is_closed() {
            if let Err(e) = self.flush() {
                warn!(target: "folio::db", error = %e, "Failed to flush log on drop");
            }
        }
        self.unregister();
    }
}
