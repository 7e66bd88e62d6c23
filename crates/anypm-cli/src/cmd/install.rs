//! The `install` command.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use anypm_core::{Context, Engine, NullReporter, Reporter, Settings};

use crate::ui::{TerminalReporter, Theme, render_outcomes, render_plan};

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    pub quiet: bool,
    pub json: bool,
    pub project_dir: Option<PathBuf>,
}

/// Install `packages` in order and print one line per outcome.
///
/// Exits 0 only when every request succeeded.
pub async fn install(packages: &[String], opts: &InstallOptions) -> Result<ExitCode> {
    let project_dir = match &opts.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let settings = Settings::load(project_dir).context("failed to load settings")?;

    let reporter: Arc<dyn Reporter> = if opts.quiet || opts.json {
        Arc::new(NullReporter)
    } else {
        Arc::new(TerminalReporter::new())
    };
    let ctx = Context::from_settings(settings, reporter).context("failed to build HTTP client")?;
    let engine = Engine::new(&ctx);
    let theme = Theme::default();
    let color = crate::ui::color_enabled();

    if opts.dry_run {
        let plan = engine.plan(packages).await;
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print!("{}", render_plan(&plan, &theme, color));
        }
        let ok = plan.iter().all(|p| p.reason.is_none());
        return Ok(exit_code(ok));
    }

    let log = engine.install_all(packages).await;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        print!("{}", render_outcomes(log.outcomes(), &theme, color));
    }
    Ok(exit_code(log.all_succeeded()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
