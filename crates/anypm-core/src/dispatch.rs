//! Routing from a resolved ecosystem to exactly one installer.

use std::collections::HashMap;
use std::sync::Arc;

use anypm_schema::{Ecosystem, InstallOutcome, PackageRequest};

use crate::context::Context;
use crate::error::InstallFailure;
use crate::installers::{Installer, NpmInstaller, ReleaseInstaller, SubprocessInstaller};

#[derive(Default)]
pub struct Dispatcher {
    installers: HashMap<Ecosystem, Arc<dyn Installer>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.installers.keys().collect();
        registered.sort();
        f.debug_struct("Dispatcher")
            .field("registered", &registered)
            .finish()
    }
}

impl Dispatcher {
    /// A dispatcher with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in installer, wired to `ctx`.
    pub fn standard(ctx: &Context) -> Self {
        let mut dispatcher = Self::new();
        let project_dir = &ctx.settings.project_dir;

        dispatcher.register(Arc::new(NpmInstaller::new(ctx.runner.clone(), &ctx.settings)));
        dispatcher.register(Arc::new(ReleaseInstaller::new(ctx.clone())));
        for eco in [
            Ecosystem::Pip,
            Ecosystem::Cargo,
            Ecosystem::Go,
            Ecosystem::Homebrew,
        ] {
            if let Some(program) = SubprocessInstaller::program_for(eco) {
                dispatcher.register(Arc::new(SubprocessInstaller::new(
                    eco,
                    program,
                    ctx.runner.clone(),
                    project_dir,
                )));
            }
        }
        dispatcher
    }

    /// Register `installer` for its ecosystem, replacing any previous one.
    pub fn register(&mut self, installer: Arc<dyn Installer>) {
        self.installers.insert(installer.ecosystem(), installer);
    }

    /// Run the single installer for `ecosystem` and record its outcome.
    ///
    /// System tools and unrecognised identifiers fail without reaching an
    /// installer.
    pub async fn dispatch(&self, request: &PackageRequest, ecosystem: Ecosystem) -> InstallOutcome {
        let id = request.raw_identifier();
        let result = match ecosystem {
            Ecosystem::SystemTool => Err(InstallFailure::SystemTool(request.payload().to_string())),
            Ecosystem::Invalid => Err(InstallFailure::Undetected),
            eco => match self.installers.get(&eco) {
                Some(installer) => {
                    tracing::info!(identifier = id, ecosystem = %eco, "installing");
                    installer.install(request).await
                }
                None => Err(InstallFailure::Fatal(format!("no installer registered for {eco}"))),
            },
        };

        match result {
            Ok(detail) => InstallOutcome::succeeded(id, detail),
            Err(failure) => failure.into_outcome(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anypm_schema::FailureKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingInstaller {
        eco: Ecosystem,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Installer for CountingInstaller {
        fn ecosystem(&self) -> Ecosystem {
            self.eco
        }

        async fn install(&self, _request: &PackageRequest) -> Result<Option<String>, InstallFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("done".to_string()))
        }
    }

    fn counting(eco: Ecosystem) -> Arc<CountingInstaller> {
        Arc::new(CountingInstaller {
            eco,
            calls: AtomicUsize::new(0),
        })
    }

    fn request(raw: &str) -> PackageRequest {
        crate::spec::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_routes_to_exactly_one_installer() {
        let pip = counting(Ecosystem::Pip);
        let cargo = counting(Ecosystem::Cargo);
        let mut d = Dispatcher::new();
        d.register(pip.clone());
        d.register(cargo.clone());

        let outcome = d.dispatch(&request("pip:requests"), Ecosystem::Pip).await;

        assert!(outcome.success());
        assert_eq!(outcome.detail(), Some("done"));
        assert_eq!(pip.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cargo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_system_tool_and_invalid_never_install() {
        let npm = counting(Ecosystem::Npm);
        let mut d = Dispatcher::new();
        d.register(npm.clone());

        let tool = d.dispatch(&request("git"), Ecosystem::SystemTool).await;
        assert_eq!(tool.failure_kind(), Some(FailureKind::SystemToolNotInstallable));
        assert_eq!(
            tool.failure_reason(),
            Some("'git' is a system tool; install it with your OS package manager")
        );

        let invalid = d.dispatch(&request("bogus$$name"), Ecosystem::Invalid).await;
        assert_eq!(invalid.failure_kind(), Some(FailureKind::EcosystemDetectionFailure));

        assert_eq!(npm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unregistered_ecosystem_is_fatal() {
        let d = Dispatcher::new();
        let outcome = d.dispatch(&request("brew:jq"), Ecosystem::Homebrew).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Fatal));
        assert_eq!(
            outcome.failure_reason(),
            Some("fatal: no installer registered for brew")
        );
    }
}
