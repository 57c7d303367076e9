//! Form echo HTTP server
//!
//! `GET /` serves a static form page; `POST /name` accepts URL-encoded
//! `first` and `last` fields and answers `{"name": "<first> <last>"}`, or a
//! 400 `{"error": ...}` when either is missing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use error::{AppError, MISSING_NAME_MESSAGE};
pub use server::{router, serve, shutdown_signal};
pub use types::{ErrorResponse, NameForm, NameResponse};
