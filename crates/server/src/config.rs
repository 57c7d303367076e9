//! Server configuration
//!
//! Settings come from the environment:
//!
//! | Variable          | Default   |
//! |-------------------|-----------|
//! | `HOST`            | `0.0.0.0` |
//! | `PORT`            | `3000`    |
//! | `FOLIO_VIEWS_DIR` | `views`   |

use std::path::PathBuf;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port
pub const DEFAULT_PORT: u16 = 3000;
/// Default directory holding `index.html`
pub const DEFAULT_VIEWS_DIR: &str = "views";
/// Default request body cap (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
        /// Parse failure
        reason: String,
    },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host or address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory holding `index.html`
    pub views_dir: PathBuf,
    /// Maximum request body size in bytes
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            views_dir: PathBuf::from(DEFAULT_VIEWS_DIR),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(host) = lookup("HOST") {
            builder = builder.host(host);
        }
        if let Some(raw) = lookup("PORT") {
            let port = raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar {
                    name: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            builder = builder.port(port);
        }
        if let Some(dir) = lookup("FOLIO_VIEWS_DIR") {
            builder = builder.views_dir(dir);
        }
        Ok(builder.build())
    }

    /// Path of the form page
    pub fn index_path(&self) -> PathBuf {
        self.views_dir.join("index.html")
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    views_dir: Option<PathBuf>,
    body_limit: Option<usize>,
}

impl ServerConfigBuilder {
    /// Sets the bind host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the views directory.
    pub fn views_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.views_dir = Some(dir.into());
        self
    }

    /// Sets the request body cap.
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = Some(bytes);
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            views_dir: self.views_dir.unwrap_or(defaults.views_dir),
            body_limit: self.body_limit.unwrap_or(defaults.body_limit),
        }
    }
}
