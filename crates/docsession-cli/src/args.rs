//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsession")]
#[command(about = "Snapshot and restore editor document sessions")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Session manifest path (overrides the config file)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Content cache directory (overrides the config file)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Cache file suffix, including the leading dot (overrides the config file)
    #[arg(long, global = true)]
    pub cache_extension: Option<String>,

    /// Do not record unsaved documents whose text is empty
    #[arg(long, global = true)]
    pub skip_empty_unsaved: bool,

    /// Restore saved documents from their cache copy when the file is gone
    #[arg(long, global = true)]
    pub recover_from_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Snapshot the documents described by a JSON listing
    Snapshot {
        /// JSON array of open documents
        #[arg(long, short)]
        documents: PathBuf,
    },

    /// Print reconstruction instructions for the saved session, one JSON object per line
    Restore,

    /// Print the saved session manifest
    Inspect,
}
