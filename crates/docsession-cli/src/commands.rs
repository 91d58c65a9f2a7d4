//! Subcommand handlers

use anyhow::Context;
use docsession_core::{InMemoryHost, SessionLifecycle, SessionStore};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Run the shutdown path against a host described by a JSON listing
pub fn snapshot(store: SessionStore, documents: &Path) -> anyhow::Result<()> {
    let listing = fs::read_to_string(documents)
        .with_context(|| format!("Failed to read document listing {}", documents.display()))?;
    let host: InMemoryHost = serde_json::from_str(&listing)
        .with_context(|| format!("Invalid document listing {}", documents.display()))?;
    tracing::debug!("Loaded {} document(s) from {:?}", host.len(), documents);

    let mut lifecycle = SessionLifecycle::new(store);
    lifecycle.on_shutdown_requested(&host);

    let report = lifecycle
        .last_snapshot()
        .context("Snapshot did not complete, see log for details")?;
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Print the reconstruction plan for the saved session
pub fn restore(store: SessionStore) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for instruction in store.restore() {
        writeln!(out, "{}", serde_json::to_string(&instruction)?)?;
    }
    Ok(())
}

/// Print the saved manifest
pub fn inspect(store: SessionStore) -> anyhow::Result<()> {
    let manifest = store.try_load()?;
    println!("{}", manifest.to_json()?);
    Ok(())
}
