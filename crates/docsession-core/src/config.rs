//! Session configuration
//!
//! Paths for the manifest and the content cache, plus the switches that
//! tune snapshot and restore behaviour. Loaded from an optional TOML file;
//! every key falls back to its default.

use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under the user's home that holds all session state
pub const DEFAULT_STATE_DIR: &str = ".docsession";

/// File name of the session manifest inside the state directory
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Name of the cache directory inside the state directory
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Suffix appended to every cache file name
pub const DEFAULT_CACHE_EXTENSION: &str = ".tmp";

/// Session engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Manifest file path
    pub session_file: PathBuf,

    /// Content cache directory
    pub cache_dir: PathBuf,

    /// Cache file suffix, including the leading dot
    pub cache_extension: String,

    /// Do not record unsaved documents whose text is empty
    pub skip_empty_unsaved: bool,

    /// Restore a saved document from its cache copy when the file on disk is gone
    pub recover_from_cache_when_missing: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let state_dir = dirs::home_dir()
            .unwrap_or_default()
            .join(DEFAULT_STATE_DIR);
        Self::in_dir(state_dir)
    }
}

impl SessionConfig {
    /// Configuration with all state stored under `state_dir`
    pub fn in_dir(state_dir: impl AsRef<Path>) -> Self {
        let state_dir = state_dir.as_ref();
        Self {
            session_file: state_dir.join(DEFAULT_SESSION_FILE),
            cache_dir: state_dir.join(DEFAULT_CACHE_DIR),
            cache_extension: DEFAULT_CACHE_EXTENSION.to_string(),
            skip_empty_unsaved: false,
            recover_from_cache_when_missing: false,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        debug!("Loaded session config from {:?}", path);
        Ok(config)
    }

    /// Check that the configured paths can work together
    pub fn validate(&self) -> SessionResult<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(SessionError::Config("cache_dir must not be empty".into()));
        }
        if self.session_file.as_os_str().is_empty() {
            return Err(SessionError::Config("session_file must not be empty".into()));
        }
        // The reclaimer deletes every unreferenced file in the cache directory.
        if self.session_file.parent() == Some(self.cache_dir.as_path()) {
            return Err(SessionError::Config(
                "session_file must not live inside cache_dir".into(),
            ));
        }
        if self.cache_extension.contains(['/', '\\']) {
            return Err(SessionError::Config(format!(
                "cache_extension {:?} must not contain path separators",
                self.cache_extension
            )));
        }
        Ok(())
    }

    /// Override the manifest path
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Override the cache directory
    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = path.into();
        self
    }

    /// Override the cache file suffix
    pub fn with_cache_extension(mut self, extension: impl Into<String>) -> Self {
        self.cache_extension = extension.into();
        self
    }

    /// Skip unsaved documents with empty text
    pub fn with_skip_empty_unsaved(mut self, skip: bool) -> Self {
        self.skip_empty_unsaved = skip;
        self
    }

    /// Fall back to the cache copy of a saved document whose file is gone
    pub fn with_recover_from_cache_when_missing(mut self, recover: bool) -> Self {
        self.recover_from_cache_when_missing = recover;
        self
    }
}
