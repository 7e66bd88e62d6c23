//! Subprocess execution with inherited standard streams.
//!
//! Native install commands write straight to the user's terminal; only the
//! exit status comes back. A started process always runs to completion.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

/// A command to run: program name, arguments, and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status of a finished process. `code` is `None` if it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    pub code: Option<i32>,
}

impl ProcessStatus {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion and report how it exited.
    ///
    /// `Err` means the process could not be started at all.
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessStatus>;
}

/// Runs real processes via `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessStatus> {
        let program = which::which(&invocation.program).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found on PATH: {e}", invocation.program),
            )
        })?;

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %invocation, "spawning");
        let status = cmd.status().await?;
        Ok(ProcessStatus {
            code: status.code(),
        })
    }
}
