//! Host lifecycle hooks
//!
//! The host calls [`SessionLifecycle::on_shutdown_requested`] when the user
//! asks to close and [`SessionLifecycle::on_startup`] once it is ready to
//! open documents. Neither hook can fail from the host's point of view:
//! persistence and restore are best effort, and problems end up in the log.

use crate::document::{DocumentHost, DocumentSink};
use crate::error::SessionError;
use crate::store::{SessionStore, SnapshotReport};
use serde::Serialize;
use tracing::{error, info, warn};

/// Whether the host may go ahead with its shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownDecision {
    Proceed,
}

/// Outcome of replaying a session into the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Entries in the loaded manifest
    pub planned: usize,
    /// Documents the host created
    pub restored: usize,
    /// Entries with nothing left to restore from
    pub skipped: usize,
    /// Instructions the host failed to carry out
    pub failed: usize,
}

/// Session engine bound to one host process
pub struct SessionLifecycle {
    store: SessionStore,
    last_snapshot: Option<SnapshotReport>,
}

impl SessionLifecycle {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            last_snapshot: None,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Report of the most recent successful snapshot
    pub fn last_snapshot(&self) -> Option<&SnapshotReport> {
        self.last_snapshot.as_ref()
    }

    /// Snapshot the session before the host closes
    ///
    /// Runs the whole snapshot cycle to completion, then always lets the
    /// host proceed.
    pub fn on_shutdown_requested<H>(&mut self, host: &H) -> ShutdownDecision
    where
        H: DocumentHost + ?Sized,
    {
        match self.store.snapshot(host) {
            Ok(report) => {
                if !report.write_failures.is_empty() {
                    warn!(
                        "{} document(s) were saved without a cache backup",
                        report.write_failures.len()
                    );
                }
                self.last_snapshot = Some(report);
            }
            Err(e) => log_snapshot_failure(&e),
        }
        ShutdownDecision::Proceed
    }

    /// Recreate the previous session's documents in the host
    pub fn on_startup<S>(&self, sink: &mut S) -> RestoreReport
    where
        S: DocumentSink + ?Sized,
    {
        let manifest = self.store.load();
        let instructions = self.store.plan_reconstruction(&manifest);

        let mut report = RestoreReport {
            planned: manifest.len(),
            skipped: manifest.len() - instructions.len(),
            ..RestoreReport::default()
        };

        for instruction in &instructions {
            match sink.create_document(instruction) {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    warn!("Host could not recreate {}: {}", instruction.identity, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            planned = report.planned,
            restored = report.restored,
            skipped = report.skipped,
            failed = report.failed,
            "Session restore complete"
        );
        report
    }
}

fn log_snapshot_failure(e: &SessionError) {
    match e {
        SessionError::StorageUnavailable { .. } => {
            error!("Session snapshot aborted, cache storage unavailable: {}", e)
        }
        _ => error!("Session snapshot failed: {}", e),
    }
}
