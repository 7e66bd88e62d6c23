//! Shared installation context.
//!
//! Groups the settings and the injected effects (network, processes,
//! progress output) that every stage of a run needs.

use std::fmt;
use std::sync::Arc;

use crate::error::NetError;
use crate::net::{HttpTransport, Transport};
use crate::process::{CommandRunner, SystemRunner};
use crate::reporter::Reporter;
use crate::settings::Settings;

#[derive(Clone)]
pub struct Context {
    pub settings: Arc<Settings>,
    pub transport: Arc<dyn Transport>,
    pub runner: Arc<dyn CommandRunner>,
    pub reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(
        settings: Settings,
        transport: Arc<dyn Transport>,
        runner: Arc<dyn CommandRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            runner,
            reporter,
        }
    }

    /// Production context: real HTTP and real subprocesses.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_settings(settings: Settings, reporter: Arc<dyn Reporter>) -> Result<Self, NetError> {
        let transport = HttpTransport::new(&settings)?;
        Ok(Self::new(
            settings,
            Arc::new(transport),
            Arc::new(SystemRunner),
            reporter,
        ))
    }
}
