//! Session manifest data structures
//!
//! The manifest maps every tracked document's display identity to a
//! descriptor telling where its content lives. It is rebuilt from scratch
//! on every snapshot and serialized as a single JSON object:
//!
//! ```json
//! {
//!   "untitled:1": {
//!     "temp_location": "/home/u/.docsession/cache/3f2a...e1.tmp",
//!     "file_location": null,
//!     "short_name": "Untitled Document 1",
//!     "saved": false
//!   }
//! }
//! ```

use crate::document::DocumentIdentity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, btree_map};
use std::path::{Path, PathBuf};

/// Storage descriptor for one tracked document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    /// Cache file holding this document's text
    #[serde(rename = "temp_location")]
    pub cache_location: PathBuf,

    /// File backing the document, absent for never-saved buffers
    #[serde(rename = "file_location", default)]
    pub original_path: Option<PathBuf>,

    /// Short name for display
    #[serde(rename = "short_name")]
    pub display_name: String,

    /// True when the content on disk at `original_path` is authoritative
    #[serde(rename = "saved")]
    pub persisted: bool,
}

impl DocumentDescriptor {
    /// Descriptor whose cache file is the only copy of its content
    pub fn unsaved(
        cache_location: impl Into<PathBuf>,
        original_path: Option<PathBuf>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            cache_location: cache_location.into(),
            original_path,
            display_name: display_name.into(),
            persisted: false,
        }
    }

    /// Descriptor for a document in sync with its file on disk
    pub fn persisted(
        cache_location: impl Into<PathBuf>,
        original_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            cache_location: cache_location.into(),
            original_path: Some(original_path.into()),
            display_name: display_name.into(),
            persisted: true,
        }
    }

    /// Backing file path, if any
    pub fn original_path(&self) -> Option<&Path> {
        self.original_path.as_deref()
    }
}

/// Mapping from document identity to descriptor
///
/// Ordered so that an unchanged session always serializes to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<DocumentIdentity, DocumentDescriptor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the descriptor for `identity`
    pub fn insert(
        &mut self,
        identity: DocumentIdentity,
        descriptor: DocumentDescriptor,
    ) -> Option<DocumentDescriptor> {
        self.entries.insert(identity, descriptor)
    }

    pub fn get(&self, identity: &DocumentIdentity) -> Option<&DocumentDescriptor> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &DocumentIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in identity order
    pub fn iter(&self) -> btree_map::Iter<'_, DocumentIdentity, DocumentDescriptor> {
        self.entries.iter()
    }

    /// Every cache location referenced by the manifest
    pub fn live_locations(&self) -> HashSet<PathBuf> {
        self.entries
            .values()
            .map(|descriptor| descriptor.cache_location.clone())
            .collect()
    }

    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a DocumentIdentity, &'a DocumentDescriptor);
    type IntoIter = btree_map::Iter<'a, DocumentIdentity, DocumentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(DocumentIdentity, DocumentDescriptor)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (DocumentIdentity, DocumentDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
