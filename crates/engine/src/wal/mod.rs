//! Write-ahead log
//!
//! Durable databases append one [`WalEntry::Commit`] per committed
//! transaction to `folio.wal` in the data directory. On open the log is read
//! back front to back and every commit is re-applied to an empty store.
//!
//! ## Recovery rules
//!
//! - A record cut short at the end of the file (torn write) ends replay; the
//!   caller truncates the file back to the last complete record.
//! - A record with a bad checksum anywhere is corruption and fails the open.

pub mod encoding;

use crate::database::config::DurabilityMode;
use crate::transaction::Mutation;
use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

pub use encoding::{decode_entry, encode_entry};

/// Log file name placed in the database data directory.
pub const WAL_FILE_NAME: &str = "folio.wal";

/// A log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalEntry {
    /// All mutations of one committed transaction
    Commit {
        /// Transaction id, increasing within a process
        txn_id: u64,
        /// Commit time (microseconds since epoch)
        timestamp: i64,
        /// Changes in the order they were made
        mutations: Vec<Mutation>,
    },
}

/// Appends entries to the log file
#[derive(Debug)]
pub struct WalWriter {
    file: File,
    mode: DurabilityMode,
    /// Length of the file up to the last fully written record
    valid_len: u64,
}

impl WalWriter {
    /// Open (or create) the log for appending
    pub fn open(path: &Path, mode: DurabilityMode) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let valid_len = file.metadata()?.len();
        Ok(Self {
            file,
            mode,
            valid_len,
        })
    }

    /// Append one entry, syncing it when the mode is `Always`
    ///
    /// On failure any bytes of the entry that reached the file are cut off,
    /// so the log still ends on a record boundary.
    pub fn append(&mut self, entry: &WalEntry) -> Result<()> {
        let bytes = encode_entry(entry)?;
        if let Err(e) = self.write_record(&bytes) {
            if let Err(cleanup) = self.discard_partial() {
                warn!(
                    target: "folio::wal",
                    error = %cleanup,
                    "Could not cut back partial log record"
                );
            }
            return Err(e);
        }
        self.valid_len += bytes.len() as u64;
        Ok(())
    }

    fn write_record(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        if self.mode == DurabilityMode::Always {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Truncate anything written after the last complete record
    pub(crate) fn discard_partial(&mut self) -> Result<()> {
        self.file.set_len(self.valid_len)?;
        Ok(())
    }

    /// Flush buffered data and fsync
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

/// Result of reading a log from disk
#[derive(Debug, Default)]
pub struct WalReplay {
    /// Complete entries in log order
    pub entries: Vec<WalEntry>,
    /// Byte length of the prefix holding complete entries
    pub valid_len: u64,
    /// Whether an incomplete record followed the valid prefix
    pub torn_tail: bool,
}

/// Read every complete entry from a log file
///
/// A missing file reads as an empty log.
///
/// # Errors
/// `Error::Corruption` if any record fails its checksum or cannot be decoded.
pub fn read_wal(path: &Path) -> Result<WalReplay> {
    let mut buf = Vec::new();
    match File::open(path) {
        Ok(mut file) => {
            file.read_to_end(&mut buf)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(WalReplay::default()),
        Err(e) => return Err(e.into()),
    }

    let mut replay = WalReplay::default();
    let mut offset = 0usize;
    while offset < buf.len() {
        match decode_entry(&buf[offset..], offset as u64) {
            Ok((entry, consumed)) => {
                replay.entries.push(entry);
                offset += consumed;
            }
            Err(Error::IncompleteEntry { .. }) => {
                replay.torn_tail = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    replay.valid_len = offset as u64;
    Ok(replay)
}

/// Cut the log back to its valid prefix
pub fn truncate_wal(path: &Path, len: u64) -> Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(len)?;
    file.sync_all()?;
    Ok(())
}
