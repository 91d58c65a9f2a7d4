//! Host-facing document types
//!
//! The engine never touches the editor's own document objects. The host
//! describes its open documents through [`DocumentHost`] and recreates them
//! from instructions handed to a [`DocumentSink`].

use crate::error::SessionResult;
use crate::store::ReconstructionInstruction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Display identity of a document, as assigned by the host
///
/// Unique per open document within one session; used as the manifest key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentIdentity(String);

impl DocumentIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentIdentity {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl From<String> for DocumentIdentity {
    fn from(identity: String) -> Self {
        Self(identity)
    }
}

/// One document currently open in the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDocument {
    /// Display identity (manifest key)
    pub identity: DocumentIdentity,

    /// Short name shown in tabs
    pub display_name: String,

    /// File backing the document, if it was ever saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing_path: Option<PathBuf>,

    /// Full current text
    #[serde(default)]
    pub text: String,

    /// Whether the buffer differs from its backing file
    #[serde(default)]
    pub has_unsaved_changes: bool,
}

impl OpenDocument {
    /// A never-saved scratch buffer
    pub fn scratch(
        identity: impl Into<DocumentIdentity>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            backing_path: None,
            text: text.into(),
            has_unsaved_changes: true,
        }
    }

    /// A document backed by a file and in sync with it
    pub fn saved(
        identity: impl Into<DocumentIdentity>,
        display_name: impl Into<String>,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            backing_path: Some(path.into()),
            text: text.into(),
            has_unsaved_changes: false,
        }
    }

    /// Mark the document as carrying unsaved edits
    pub fn modified(mut self) -> Self {
        self.has_unsaved_changes = true;
        self
    }
}

/// Read access to the host's open documents
pub trait DocumentHost {
    /// Every open document
    fn open_documents(&self) -> Vec<OpenDocument>;

    /// Only documents with unsaved in-memory changes
    fn unsaved_documents(&self) -> Vec<OpenDocument> {
        self.open_documents()
            .into_iter()
            .filter(|doc| doc.has_unsaved_changes)
            .collect()
    }
}

/// Receiver of reconstruction instructions at startup
///
/// Each call must create exactly one document in the host.
pub trait DocumentSink {
    fn create_document(&mut self, instruction: &ReconstructionInstruction) -> SessionResult<()>;
}

/// A host backed by a fixed list of documents
///
/// Used by the command-line front-end (loaded from a JSON listing) and by
/// tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryHost {
    documents: Vec<OpenDocument>,
}

impl InMemoryHost {
    pub fn new(documents: Vec<OpenDocument>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[OpenDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentHost for InMemoryHost {
    fn open_documents(&self) -> Vec<OpenDocument> {
        self.documents.clone()
    }
}

impl DocumentSink for Vec<ReconstructionInstruction> {
    fn create_document(&mut self, instruction: &ReconstructionInstruction) -> SessionResult<()> {
        self.push(instruction.clone());
        Ok(())
    }
}
