//! Database configuration via `folio.toml`
//!
//! A durable database keeps a small config file in its data directory. On
//! first open, a default `folio.toml` is created. To change settings, edit
//! the file and reopen the database.

use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// How hard the write-ahead log works to reach the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Write every commit to the log without an fsync; the OS flushes it.
    /// A crash of the machine may lose the most recent commits.
    Standard,
    /// fsync the log after every commit.
    Always,
}

/// Database configuration loaded from `folio.toml`.
///
/// # Example
///
/// ```toml
/// # Durability mode: "standard" (default) or "always"
/// durability = "standard"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Durability mode: `"standard"` or `"always"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
        }
    }
}

impl FolioConfig {
    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> Result<DurabilityMode> {
        match self.durability.as_str() {
            "standard" => Ok(DurabilityMode::Standard),
            "always" => Ok(DurabilityMode::Always),
            other => Err(Error::invalid_input(format!(
                "Invalid durability mode '{}' in folio.toml. Expected \"standard\" or \"always\".",
                other
            ))),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Folio database configuration
#
# Durability mode: "standard" (default) or "always"
#   "standard" = write each commit to the log, let the OS flush it
#   "always"   = fsync the log after every commit
durability = "standard"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FolioConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.durability_mode()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
