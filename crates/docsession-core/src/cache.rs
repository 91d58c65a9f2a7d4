//! Content-addressed cache of document text
//!
//! Each document's text is stored in a flat directory under a file name
//! derived from a SHA-256 of its display identity, so the location of an
//! entry can be recomputed at any time without a lookup table.

use crate::document::DocumentIdentity;
use crate::error::{SessionError, SessionResult};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk cache of document snapshots
#[derive(Debug, Clone)]
pub struct ContentCache {
    /// Directory holding the cache files
    dir: PathBuf,
    /// Suffix appended to every hashed file name
    extension: String,
}

impl ContentCache {
    /// Create a cache rooted at `dir` with the given file suffix
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory if it does not exist yet
    pub fn ensure_directory(&self) -> SessionResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionError::StorageUnavailable {
            path: self.dir.clone(),
            source,
        })
    }

    /// Deterministic cache path for a document identity
    pub fn location_for(&self, identity: &DocumentIdentity) -> PathBuf {
        self.dir
            .join(format!("{}{}", hash_identity(identity), self.extension))
    }

    /// Create or overwrite the cache file at `location`
    pub fn write(&self, location: &Path, content: &str) -> SessionResult<()> {
        fs::write(location, content).map_err(|source| SessionError::StorageWrite {
            path: location.to_path_buf(),
            source,
        })?;
        debug!("Cached {} bytes at {:?}", content.len(), location);
        Ok(())
    }

    /// Read a cache file back
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(&self, location: &Path) -> SessionResult<Option<String>> {
        match fs::read_to_string(location) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    /// Delete every cache file that is not in `live`
    ///
    /// Only regular files directly inside the cache directory are
    /// considered. Returns the number of files removed; a file that cannot
    /// be removed is logged and skipped.
    pub fn reclaim_orphans(&self, live: &HashSet<PathBuf>) -> SessionResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(SessionError::StorageUnavailable {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file || live.contains(&path) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Reclaimed orphaned cache file {:?}", path);
                    removed += 1;
                }
                Err(e) => warn!("Failed to reclaim cache file {:?}: {}", path, e),
            }
        }

        Ok(removed)
    }
}

/// Hex-encoded SHA-256 of the identity string
fn hash_identity(identity: &DocumentIdentity) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}
