//! Error types for session persistence

use std::path::PathBuf;
use thiserror::Error;

/// Session persistence errors
///
/// An absent cache file or backing path is not an error: reads that may
/// legitimately find nothing return `Ok(None)`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage unavailable at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache entry {path:?}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session manifest {path:?} is corrupt: {reason}")]
    ManifestCorrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Host rejected document: {0}")]
    Host(String),
}

impl SessionError {
    /// Create a host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
