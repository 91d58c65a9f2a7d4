//! Snapshot protocol: host documents -> cache files + manifest

use super::SessionStore;
use crate::document::{DocumentHost, DocumentIdentity, OpenDocument};
use crate::error::SessionResult;
use crate::manifest::{DocumentDescriptor, Manifest};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one snapshot cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    /// Documents recorded in the manifest
    pub entries: usize,
    /// Cache files written
    pub cache_writes: usize,
    /// Documents whose cache write failed (still recorded in the manifest)
    pub write_failures: Vec<DocumentIdentity>,
    /// Documents left out because a path could not be recorded as UTF-8
    pub skipped: Vec<DocumentIdentity>,
    /// Orphaned cache files removed after the manifest was persisted
    pub reclaimed: usize,
}

impl SessionStore {
    /// Build a fresh manifest from the host's documents
    ///
    /// Unsaved documents are recorded first with their text cached as the
    /// only copy. Every other document with a backing file is then recorded
    /// as persisted, with its text cached as a fallback. A failed cache
    /// write is reported but does not stop the snapshot.
    pub fn build_manifest<H>(&self, host: &H) -> SessionResult<(Manifest, SnapshotReport)>
    where
        H: DocumentHost + ?Sized,
    {
        self.cache.ensure_directory()?;

        let mut manifest = Manifest::new();
        let mut report = SnapshotReport::default();

        for doc in host.unsaved_documents() {
            if self.skip_empty_unsaved && doc.text.is_empty() {
                debug!("Skipping empty unsaved document {}", doc.identity);
                continue;
            }

            let location = self.cache.location_for(&doc.identity);
            if !recordable(&doc, &location) {
                report.skipped.push(doc.identity.clone());
                continue;
            }
            self.cache_text(&doc, &location, &mut report);
            manifest.insert(
                doc.identity.clone(),
                DocumentDescriptor::unsaved(location, doc.backing_path, doc.display_name),
            );
        }

        for doc in host.open_documents() {
            if manifest.contains(&doc.identity) || report.skipped.contains(&doc.identity) {
                continue;
            }
            // Never-saved buffers only survive through the unsaved pass.
            let Some(path) = doc.backing_path.clone() else {
                continue;
            };

            let location = self.cache.location_for(&doc.identity);
            if !recordable(&doc, &location) {
                report.skipped.push(doc.identity.clone());
                continue;
            }
            if path.exists() {
                self.cache_text(&doc, &location, &mut report);
            } else {
                debug!(
                    "Backing file {:?} of {} is gone, not caching a fallback",
                    path, doc.identity
                );
            }
            manifest.insert(
                doc.identity.clone(),
                DocumentDescriptor::persisted(location, path, doc.display_name),
            );
        }

        report.entries = manifest.len();
        Ok((manifest, report))
    }

    /// Run a full snapshot cycle
    ///
    /// Builds the manifest, persists it, and only then reclaims cache files
    /// the new manifest no longer references.
    pub fn snapshot<H>(&self, host: &H) -> SessionResult<SnapshotReport>
    where
        H: DocumentHost + ?Sized,
    {
        let (manifest, mut report) = self.build_manifest(host)?;
        self.persist(&manifest)?;

        // The manifest may have been configured to live in the cache directory.
        let mut live = manifest.live_locations();
        live.insert(self.session_file.clone());
        live.insert(self.temp_session_file());
        report.reclaimed = self.cache.reclaim_orphans(&live)?;

        info!(
            entries = report.entries,
            cache_writes = report.cache_writes,
            write_failures = report.write_failures.len(),
            skipped = report.skipped.len(),
            reclaimed = report.reclaimed,
            "Session snapshot complete"
        );
        Ok(report)
    }

    fn cache_text(
        &self,
        doc: &OpenDocument,
        location: &Path,
        report: &mut SnapshotReport,
    ) {
        match self.cache.write(location, &doc.text) {
            Ok(()) => report.cache_writes += 1,
            Err(e) => {
                warn!("No cache backup for {}: {}", doc.identity, e);
                report.write_failures.push(doc.identity.clone());
            }
        }
    }
}

/// Whether the document's paths can be stored in the JSON manifest
fn recordable(doc: &OpenDocument, location: &Path) -> bool {
    let unrecordable = doc
        .backing_path
        .iter()
        .map(|p| p.as_path())
        .chain([location])
        .find(|p| p.to_str().is_none());
    match unrecordable {
        Some(path) => {
            warn!(
                "Leaving {} out of the session, path {:?} is not valid UTF-8",
                doc.identity, path
            );
            false
        }
        None => true,
    }
}
