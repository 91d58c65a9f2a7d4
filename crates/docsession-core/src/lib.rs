//! Session snapshot and restore for editor documents
//!
//! This crate provides the persistence side of "reopen what I had open":
//! - Content cache for unsaved and fallback document text
//! - Session manifest construction, persistence and loading
//! - Reconstruction planning for the host on next startup
//! - Lifecycle hooks for the host's shutdown and startup events

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod manifest;
pub mod store;

pub use cache::ContentCache;
pub use config::SessionConfig;
pub use document::{DocumentHost, DocumentIdentity, DocumentSink, InMemoryHost, OpenDocument};
pub use error::{SessionError, SessionResult};
pub use lifecycle::{RestoreReport, SessionLifecycle, ShutdownDecision};
pub use manifest::{DocumentDescriptor, Manifest};
pub use store::{
    InstructionKind, ReconstructionAction, ReconstructionInstruction, SessionStore,
    SnapshotReport,
};
