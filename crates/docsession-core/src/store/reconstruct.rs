//! Reconstruction protocol: manifest -> instructions for the host
//!
//! Each descriptor is resolved against this table, first match wins:
//!
//! | original path | persisted | cache file | action                  |
//! |---------------|-----------|------------|-------------------------|
//! | absent        | any       | present    | from cache, detached    |
//! | absent        | any       | missing    | empty document          |
//! | present       | true      | any        | open from disk          |
//! | present       | false     | present    | from cache, attached    |
//! | present       | false     | missing    | open from disk          |
//!
//! Rows that open from disk are dropped when the file no longer exists.

use super::SessionStore;
use crate::document::DocumentIdentity;
use crate::manifest::{DocumentDescriptor, Manifest};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How the host should recreate one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconstructionAction {
    /// In-memory document seeded with cached text, no backing file
    FromCacheDetached { content: String },
    /// Empty in-memory document, no backing file
    Empty,
    /// Open the file at `path`
    FromDisk { path: PathBuf },
    /// In-memory document seeded with cached text, then bound to `path`
    FromCacheAttached { content: String, path: PathBuf },
}

/// Discriminant of [`ReconstructionAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    FromCacheDetached,
    Empty,
    FromDisk,
    FromCacheAttached,
}

/// One document for the host to recreate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructionInstruction {
    pub identity: DocumentIdentity,
    pub display_name: String,
    #[serde(flatten)]
    pub action: ReconstructionAction,
}

impl ReconstructionInstruction {
    pub fn kind(&self) -> InstructionKind {
        match self.action {
            ReconstructionAction::FromCacheDetached { .. } => InstructionKind::FromCacheDetached,
            ReconstructionAction::Empty => InstructionKind::Empty,
            ReconstructionAction::FromDisk { .. } => InstructionKind::FromDisk,
            ReconstructionAction::FromCacheAttached { .. } => InstructionKind::FromCacheAttached,
        }
    }

    /// Text to seed the document with, if any
    pub fn content(&self) -> Option<&str> {
        match &self.action {
            ReconstructionAction::FromCacheDetached { content }
            | ReconstructionAction::FromCacheAttached { content, .. } => Some(content),
            _ => None,
        }
    }

    /// File to open or bind to, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.action {
            ReconstructionAction::FromDisk { path }
            | ReconstructionAction::FromCacheAttached { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl SessionStore {
    /// Resolve one manifest entry into an instruction
    ///
    /// Returns `None` when nothing can be recovered for the entry.
    pub fn plan_entry(
        &self,
        identity: &DocumentIdentity,
        descriptor: &DocumentDescriptor,
    ) -> Option<ReconstructionInstruction> {
        let action = match (&descriptor.original_path, descriptor.persisted) {
            (None, _) => match self.cached_text(identity, descriptor) {
                Some(content) => ReconstructionAction::FromCacheDetached { content },
                None => ReconstructionAction::Empty,
            },
            (Some(path), true) => {
                if path.exists() {
                    ReconstructionAction::FromDisk { path: path.clone() }
                } else if let Some(content) = self
                    .recover_from_cache_when_missing
                    .then(|| self.cached_text(identity, descriptor))
                    .flatten()
                {
                    debug!("Recovering {} from its cache copy", identity);
                    ReconstructionAction::FromCacheAttached {
                        content,
                        path: path.clone(),
                    }
                } else {
                    warn!("Skipping {}: {:?} no longer exists", identity, path);
                    return None;
                }
            }
            (Some(path), false) => match self.cached_text(identity, descriptor) {
                Some(content) => ReconstructionAction::FromCacheAttached {
                    content,
                    path: path.clone(),
                },
                None if path.exists() => {
                    warn!(
                        "Cache copy of {} is missing, unsaved edits are lost",
                        identity
                    );
                    ReconstructionAction::FromDisk { path: path.clone() }
                }
                None => {
                    warn!(
                        "Skipping {}: neither cache copy nor {:?} exists",
                        identity, path
                    );
                    return None;
                }
            },
        };

        Some(ReconstructionInstruction {
            identity: identity.clone(),
            display_name: descriptor.display_name.clone(),
            action,
        })
    }

    /// Resolve every manifest entry, dropping unrecoverable ones
    pub fn plan_reconstruction(&self, manifest: &Manifest) -> Vec<ReconstructionInstruction> {
        manifest
            .iter()
            .filter_map(|(identity, descriptor)| self.plan_entry(identity, descriptor))
            .collect()
    }

    /// Load the session manifest and plan its reconstruction
    pub fn restore(&self) -> Vec<ReconstructionInstruction> {
        let manifest = self.load();
        self.plan_reconstruction(&manifest)
    }

    fn cached_text(
        &self,
        identity: &DocumentIdentity,
        descriptor: &DocumentDescriptor,
    ) -> Option<String> {
        match self.cache.read(&descriptor.cache_location) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cache copy of {} is unreadable: {}", identity, e);
                None
            }
        }
    }
}
