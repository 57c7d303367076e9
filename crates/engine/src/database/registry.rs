//! Process-wide registry of open durable databases
//!
//! Opening the same data directory twice returns the same `Database`, so two
//! handles never append to one log independently. Entries are weak and are
//! removed when the database is dropped.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Weak;

use super::Database;

/// Open databases keyed by canonical data directory
pub static OPEN_DATABASES: Lazy<Mutex<HashMap<PathBuf, Weak<Database>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
