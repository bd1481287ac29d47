// src/error.rs
// =============================================================================
// Error types shared by the browser, crawl and report layers.
//
// Two families:
// - CheckError: things that stop a whole command (browser cannot launch,
//   report cannot be written, bad seed URL). These bubble up to main.rs.
// - NavigationError: a single page failed to load. The crawler catches these,
//   records them in the failure map, and keeps going.
//
// The application layer (main.rs) still uses anyhow::Result like before;
// these typed errors convert into anyhow::Error automatically via `?`.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a command.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    #[error("navigation task failed: {0}")]
    Task(String),
}

impl CheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single page could not be loaded.
///
/// Every variant keeps the raw message so it can be written to the report
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("net::ERR_CONNECTION_REFUSED at {url}: {message}")]
    ConnectionRefused { url: String, message: String },

    #[error("Navigation timeout of {timeout_ms} ms exceeded at {url}")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("net::ERR_NAME_NOT_RESOLVED at {url}: {message}")]
    Dns { url: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl NavigationError {
    /// True for the "server isn't running" family of errors, which the
    /// summary reports in their own section.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, NavigationError::ConnectionRefused { .. })
    }
}
