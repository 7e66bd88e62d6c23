//! anypm - install packages from any ecosystem

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use anypm_cli::cmd;
use anypm_cli::cmd::install::InstallOptions;
use anypm_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Install {
            packages,
            json,
            project_dir,
        } => {
            let opts = InstallOptions {
                dry_run: cli.dry_run,
                quiet: cli.quiet,
                json,
                project_dir,
            };
            cmd::install::install(&packages, &opts).await
        }
    }
}
