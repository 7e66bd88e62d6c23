//! anypm - install packages from any ecosystem
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! One front door for npm, GitHub releases, pip, cargo, go and Homebrew.
//! Identifiers may carry an explicit ecosystem prefix (`npm:left-pad`,
//! `gh:owner/repo@v1.2.0`); anything unprefixed is detected by probing.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.anypm/
//! ├── config.toml  # Optional settings overrides
//! ├── cache/       # Verified release assets by owner/repo/tag
//! └── tmp/         # In-flight downloads
//! ```

pub mod cmd;
pub mod ui;

pub use anypm_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "anypm")]
#[command(author, version, about = "anypm - install packages from any ecosystem")]
pub struct Cli {
    /// Resolve ecosystems without installing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress live progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install one or more packages
    Install {
        /// Identifiers: name, eco:name, or gh:owner/repo[@tag]
        #[arg(required = true)]
        packages: Vec<String>,
        /// Print outcomes as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Directory native installers run in (defaults to the current directory)
        #[arg(long, env = "ANYPM_PROJECT_DIR")]
        project_dir: Option<PathBuf>,
    },
}
