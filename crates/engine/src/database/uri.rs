//! Connection strings
//!
//! | Form                     | Meaning                               |
//! |--------------------------|---------------------------------------|
//! | `memory://`, `memory:`   | Ephemeral in-memory database          |
//! | `folio://<path>`         | Durable database rooted at `<path>`   |
//! | `file://<path>`          | Same as `folio://`                    |
//! | `<path>` (no scheme)     | Same as `folio://`                    |

use folio_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// A parsed connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionString {
    /// No files, data lost when the database is dropped
    Memory,
    /// Data directory on disk
    Path(PathBuf),
}

impl ConnectionString {
    /// Parse a connection string
    ///
    /// # Errors
    /// `Error::InvalidInput` for an empty string, an unknown scheme, or a
    /// durable scheme without a path.
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(Error::invalid_input("connection string is empty"));
        }

        if uri == "memory:" || uri == "memory://" {
            return Ok(ConnectionString::Memory);
        }

        match uri.split_once("://") {
            Some(("folio", rest)) | Some(("file", rest)) => {
                if rest.is_empty() {
                    return Err(Error::invalid_input(format!(
                        "connection string '{}' has no path",
                        uri
                    )));
                }
                Ok(ConnectionString::Path(PathBuf::from(rest)))
            }
            Some((scheme, _)) => Err(Error::invalid_input(format!(
                "unsupported connection scheme '{}'",
                scheme
            ))),
            None => Ok(ConnectionString::Path(PathBuf::from(uri))),
        }
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionString::Memory => write!(f, "memory://"),
            ConnectionString::Path(path) => write!(f, "folio://{}", path.display()),
        }
    }
}
