//! Installers that shell out to another package manager.

use std::path::PathBuf;
use std::sync::Arc;

use anypm_schema::{Ecosystem, PackageRequest};
use async_trait::async_trait;

use super::Installer;
use crate::error::InstallFailure;
use crate::process::{CommandRunner, Invocation};

/// Delegates to `<tool> install <payload>` for a secondary registry.
///
/// The tool's own output goes straight to the terminal. Only the exit code
/// is observed, and nothing is retried here.
pub struct SubprocessInstaller {
    ecosystem: Ecosystem,
    program: &'static str,
    runner: Arc<dyn CommandRunner>,
    project_dir: PathBuf,
}

impl std::fmt::Debug for SubprocessInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessInstaller")
            .field("ecosystem", &self.ecosystem)
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl SubprocessInstaller {
    pub fn new(
        ecosystem: Ecosystem,
        program: &'static str,
        runner: Arc<dyn CommandRunner>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ecosystem,
            program,
            runner,
            project_dir: project_dir.into(),
        }
    }

    /// The native tool for a subprocess-backed ecosystem.
    pub fn program_for(ecosystem: Ecosystem) -> Option<&'static str> {
        match ecosystem {
            Ecosystem::Npm => Some("npm"),
            Ecosystem::Pip => Some("pip"),
            Ecosystem::Cargo => Some("cargo"),
            Ecosystem::Go => Some("go"),
            Ecosystem::Homebrew => Some("brew"),
            Ecosystem::GitHubRelease | Ecosystem::SystemTool | Ecosystem::Invalid => None,
        }
    }

    pub(crate) fn invocation(&self, payload: &str) -> Invocation {
        Invocation::new(self.program)
            .arg("install")
            .arg(payload)
            .current_dir(&self.project_dir)
    }

    /// Run the install command and map its exit to success or failure.
    pub(crate) async fn run(&self, payload: &str) -> Result<(), InstallFailure> {
        let invocation = self.invocation(payload);
        match self.runner.run(&invocation).await {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                tracing::warn!(command = %invocation, code = ?status.code, "install command failed");
                Err(InstallFailure::Subprocess(self.ecosystem))
            }
            Err(e) => {
                tracing::warn!(command = %invocation, error = %e, "install command could not start");
                Err(InstallFailure::Subprocess(self.ecosystem))
            }
        }
    }
}

#[async_trait]
impl Installer for SubprocessInstaller {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    async fn install(&self, request: &PackageRequest) -> Result<Option<String>, InstallFailure> {
        self.run(request.payload()).await?;
        Ok(None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::process::ProcessStatus;
    use std::sync::Mutex;

    /// Records invocations and answers with a fixed exit code.
    pub(crate) struct RecordingRunner {
        pub code: Option<i32>,
        pub spawn_error: bool,
        pub calls: Mutex<Vec<Invocation>>,
        pub on_run: Box<dyn Fn(&Invocation) + Send + Sync>,
    }

    impl RecordingRunner {
        pub fn exiting(code: i32) -> Arc<Self> {
            Arc::new(Self {
                code: Some(code),
                spawn_error: false,
                calls: Mutex::new(Vec::new()),
                on_run: Box::new(|_| {}),
            })
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessStatus> {
            self.calls.lock().unwrap().push(invocation.clone());
            if self.spawn_error {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such tool"));
            }
            (self.on_run)(invocation);
            Ok(ProcessStatus { code: self.code })
        }
    }

    fn request(raw: &str) -> PackageRequest {
        crate::spec::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_runs_native_install_verbatim() {
        let runner = RecordingRunner::exiting(0);
        let installer = SubprocessInstaller::new(Ecosystem::Go, "go", runner.clone(), "/work");

        let result = installer
            .install(&request("go:golang.org/x/tools/gopls@latest"))
            .await;

        assert_eq!(result, Ok(None));
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "go install golang.org/x/tools/gopls@latest");
        assert_eq!(calls[0].cwd.as_deref(), Some(std::path::Path::new("/work")));
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_once() {
        let runner = RecordingRunner::exiting(1);
        let installer = SubprocessInstaller::new(Ecosystem::Pip, "pip", runner.clone(), "/work");

        let err = installer.install(&request("pip:requests")).await.unwrap_err();

        assert_eq!(err.to_string(), "pip install failed");
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_tool_is_subprocess_failure() {
        let runner = Arc::new(RecordingRunner {
            code: None,
            spawn_error: true,
            calls: Mutex::new(Vec::new()),
            on_run: Box::new(|_| {}),
        });
        let installer = SubprocessInstaller::new(Ecosystem::Homebrew, "brew", runner, "/work");

        let err = installer.install(&request("brew:jq")).await.unwrap_err();
        assert_eq!(err, InstallFailure::Subprocess(Ecosystem::Homebrew));
        assert_eq!(err.to_string(), "brew install failed");
    }

    #[test]
    fn test_program_for() {
        assert_eq!(SubprocessInstaller::program_for(Ecosystem::Cargo), Some("cargo"));
        assert_eq!(SubprocessInstaller::program_for(Ecosystem::GitHubRelease), None);
    }
}
