//! Batch execution and outcome aggregation.
//!
//! Requests run strictly one at a time in input order: installers share the
//! project's dependency store, and the npm fingerprint comparison is only
//! sound if nothing else touches it mid-install. Every input produces exactly
//! one outcome, at the same position, whatever happens to the others.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anypm_schema::{Ecosystem, InstallOutcome};
use futures::FutureExt;
use serde::Serialize;

use crate::context::Context;
use crate::detect::Detector;
use crate::dispatch::Dispatcher;
use crate::error::InstallFailure;
use crate::reporter::Reporter;
use crate::spec;

/// Outcomes recorded by input position.
///
/// Keyed by position rather than identifier, so duplicate identifiers each
/// keep their own outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutcomeLog {
    outcomes: Vec<InstallOutcome>,
}

impl OutcomeLog {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(n),
        }
    }

    fn record(&mut self, outcome: InstallOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[InstallOutcome] {
        &self.outcomes
    }

    pub fn into_vec(self) -> Vec<InstallOutcome> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// What a dry run would do with one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRequest {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<Ecosystem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Drives parse → detect → dispatch for a list of identifiers.
pub struct Engine {
    detector: Detector,
    dispatcher: Dispatcher,
    reporter: std::sync::Arc<dyn Reporter>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// An engine with every built-in installer.
    pub fn new(ctx: &Context) -> Self {
        Self::with_dispatcher(ctx, Dispatcher::standard(ctx))
    }

    pub fn with_dispatcher(ctx: &Context, dispatcher: Dispatcher) -> Self {
        Self {
            detector: Detector::new(ctx.transport.clone(), ctx.settings.clone()),
            dispatcher,
            reporter: ctx.reporter.clone(),
        }
    }

    /// Install every identifier, in order, and return one outcome per input.
    pub async fn install_all(&self, identifiers: &[String]) -> OutcomeLog {
        let mut log = OutcomeLog::with_capacity(identifiers.len());

        for raw in identifiers {
            let outcome = match AssertUnwindSafe(self.install_one(raw)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let detail = panic_message(payload.as_ref());
                    tracing::error!(identifier = %raw, %detail, "installer panicked");
                    InstallFailure::Fatal(detail).into_outcome(raw)
                }
            };

            match outcome.failure_reason() {
                None => self.reporter.done(raw, outcome.detail()),
                Some(reason) => self.reporter.failed(raw, reason),
            }
            log.record(outcome);
        }

        debug_assert_eq!(log.len(), identifiers.len());
        log
    }

    async fn install_one(&self, raw: &str) -> InstallOutcome {
        let request = match spec::parse(raw) {
            Ok(request) => request,
            Err(failure) => return failure.into_outcome(raw),
        };

        let ecosystem = self.detector.detect(&request).await;
        tracing::debug!(identifier = raw, %ecosystem, "resolved ecosystem");
        self.reporter.detected(raw, ecosystem);

        if ecosystem.is_installable() {
            self.reporter.installing(raw, ecosystem);
        }
        self.dispatcher.dispatch(&request, ecosystem).await
    }

    /// Parse and detect every identifier without installing anything.
    pub async fn plan(&self, identifiers: &[String]) -> Vec<PlannedRequest> {
        let mut planned = Vec::with_capacity(identifiers.len());
        for raw in identifiers {
            let entry = match spec::parse(raw) {
                Ok(request) => {
                    let eco = self.detector.detect(&request).await;
                    let reason = match eco {
                        Ecosystem::SystemTool => {
                            Some(InstallFailure::SystemTool(request.payload().to_string()).to_string())
                        }
                        Ecosystem::Invalid => Some(InstallFailure::Undetected.to_string()),
                        _ => None,
                    };
                    PlannedRequest {
                        identifier: raw.clone(),
                        ecosystem: Some(eco),
                        reason,
                    }
                }
                Err(failure) => PlannedRequest {
                    identifier: raw.clone(),
                    ecosystem: None,
                    reason: Some(failure.to_string()),
                },
            };
            planned.push(entry);
        }
        planned
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "installer panicked".to_string()
    }
}
