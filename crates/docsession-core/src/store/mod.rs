//! Session store
//!
//! Owns the session manifest file: builds the manifest at snapshot time,
//! persists it, loads it at startup and turns it into reconstruction
//! instructions. All cache file access goes through [`ContentCache`].

mod reconstruct;
mod snapshot;

pub use reconstruct::{InstructionKind, ReconstructionAction, ReconstructionInstruction};
pub use snapshot::SnapshotReport;

use crate::cache::ContentCache;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::manifest::Manifest;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manifest owner and snapshot/restore driver
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Manifest file path
    session_file: PathBuf,
    /// Content cache for document text
    cache: ContentCache,
    /// Do not record unsaved documents with empty text
    skip_empty_unsaved: bool,
    /// Use the cache copy of a saved document whose file has disappeared
    recover_from_cache_when_missing: bool,
}

impl SessionStore {
    /// Create a store with explicit paths and default behaviour
    pub fn new(session_file: impl Into<PathBuf>, cache: ContentCache) -> Self {
        Self {
            session_file: session_file.into(),
            cache,
            skip_empty_unsaved: false,
            recover_from_cache_when_missing: false,
        }
    }

    /// Create a store from validated configuration
    pub fn from_config(config: &SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let cache = ContentCache::new(&config.cache_dir, &config.cache_extension);
        Ok(Self::new(&config.session_file, cache)
            .with_skip_empty_unsaved(config.skip_empty_unsaved)
            .with_recover_from_cache_when_missing(config.recover_from_cache_when_missing))
    }

    pub fn with_skip_empty_unsaved(mut self, skip: bool) -> Self {
        self.skip_empty_unsaved = skip;
        self
    }

    pub fn with_recover_from_cache_when_missing(mut self, recover: bool) -> Self {
        self.recover_from_cache_when_missing = recover;
        self
    }

    /// Manifest file path
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Underlying content cache
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Write the manifest, replacing any previous one
    ///
    /// The manifest is written to a sibling temp file first and then
    /// renamed into place, so readers see either the old or the new file.
    pub fn persist(&self, manifest: &Manifest) -> SessionResult<()> {
        if let Some(parent) = self.session_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| {
                    SessionError::StorageUnavailable {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let content = manifest.to_json()?;
        let temp_path = self.temp_session_file();
        fs::write(&temp_path, content)?;
        if let Err(e) = fs::rename(&temp_path, &self.session_file) {
            let _ = fs::remove_file(&temp_path);
            return Err(SessionError::Io(e));
        }

        debug!(
            "Persisted manifest with {} entries to {:?}",
            manifest.len(),
            self.session_file
        );
        Ok(())
    }

    /// Load the manifest, reporting why it could not be read
    ///
    /// A missing session file is an empty manifest. Unreadable or malformed
    /// content is `ManifestCorrupt`.
    pub fn try_load(&self) -> SessionResult<Manifest> {
        let content = match fs::read_to_string(&self.session_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session manifest at {:?}", self.session_file);
                return Ok(Manifest::new());
            }
            Err(e) => {
                return Err(SessionError::ManifestCorrupt {
                    path: self.session_file.clone(),
                    reason: e.to_string(),
                });
            }
        };

        Manifest::from_json(&content).map_err(|e| SessionError::ManifestCorrupt {
            path: self.session_file.clone(),
            reason: e.to_string(),
        })
    }

    /// Load the manifest, treating any failure as an empty session
    pub fn load(&self) -> Manifest {
        match self.try_load() {
            Ok(manifest) => {
                debug!(
                    "Loaded manifest with {} entries from {:?}",
                    manifest.len(),
                    self.session_file
                );
                manifest
            }
            Err(e) => {
                warn!("Starting with an empty session: {}", e);
                Manifest::new()
            }
        }
    }

    fn temp_session_file(&self) -> PathBuf {
        let mut name = self
            .session_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("session"));
        name.push(".partial");
        self.session_file.with_file_name(name)
    }
}
