//! Docsession CLI
//!
//! Drives the session engine from the command line, standing in for an
//! editor host:
//!
//! ```bash
//! docsession snapshot --documents open-documents.json
//! docsession restore
//! docsession inspect
//! ```
//!
//! Logs go to stderr; set RUST_LOG=docsession_core=debug for detail.

mod args;
mod commands;

use anyhow::Context;
use args::{Cli, Commands};
use clap::Parser;
use docsession_core::{SessionConfig, SessionStore};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("docsession_core=info,docsession=info")
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = SessionStore::from_config(&config)?;

    match cli.command {
        Commands::Snapshot { documents } => commands::snapshot(store, &documents),
        Commands::Restore => commands::restore(store),
        Commands::Inspect => commands::inspect(store),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(session_file) = &cli.session_file {
        config = config.with_session_file(session_file);
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }
    if let Some(extension) = &cli.cache_extension {
        config = config.with_cache_extension(extension);
    }
    if cli.skip_empty_unsaved {
        config = config.with_skip_empty_unsaved(true);
    }
    if cli.recover_from_cache {
        config = config.with_recover_from_cache_when_missing(true);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let config_path = temp.path().join("docsession.toml");
        std::fs::write(&config_path, "cache_dir = \"/from/file\"\nskip_empty_unsaved = true\n")
            .unwrap();

        let cli = Cli::parse_from([
            "docsession",
            "--config",
            config_path.to_str().unwrap(),
            "--session-file",
            "/from/flag/session.json",
            "inspect",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.cache_dir, PathBuf::from("/from/file"));
        assert_eq!(config.session_file, PathBuf::from("/from/flag/session.json"));
        assert!(config.skip_empty_unsaved);
    }

    #[test]
    fn test_behaviour_flags() {
        let cli = Cli::parse_from([
            "docsession",
            "--cache-dir",
            "/state/cache",
            "--cache-extension",
            ".bak",
            "--recover-from-cache",
            "restore",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.cache_extension, ".bak");
        assert!(config.recover_from_cache_when_missing);
        assert!(!config.skip_empty_unsaved);
    }

    #[test]
    fn test_snapshot_requires_listing() {
        assert!(Cli::try_parse_from(["docsession", "snapshot"]).is_err());
    }
}
