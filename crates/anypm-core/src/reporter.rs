//! Reporter trait for dependency injection
//!
//! This trait allows core logic to report progress and status without
//! being coupled to a specific terminal implementation. The core never
//! prints on its own.

use anypm_schema::Ecosystem;
use std::time::Duration;

pub trait Reporter: Send + Sync {
    /// The ecosystem an identifier resolved to.
    fn detected(&self, identifier: &str, ecosystem: Ecosystem);

    /// An installer has started work on the identifier.
    fn installing(&self, identifier: &str, ecosystem: Ecosystem);

    /// Updates the progress of a download.
    fn downloading(&self, identifier: &str, current: u64, total: Option<u64>);

    /// A download attempt failed and another will start after `delay`.
    fn retrying(&self, identifier: &str, attempt: u32, delay: Duration);

    /// The download finished and its checksum is being verified.
    fn verifying(&self, identifier: &str);

    /// Marks a request as successfully completed.
    fn done(&self, identifier: &str, detail: Option<&str>);

    /// Marks a request as failed with a specific reason.
    fn failed(&self, identifier: &str, reason: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn detected(&self, identifier: &str, ecosystem: Ecosystem) {
        (**self).detected(identifier, ecosystem);
    }
    fn installing(&self, identifier: &str, ecosystem: Ecosystem) {
        (**self).installing(identifier, ecosystem);
    }
    fn downloading(&self, identifier: &str, current: u64, total: Option<u64>) {
        (**self).downloading(identifier, current, total);
    }
    fn retrying(&self, identifier: &str, attempt: u32, delay: Duration) {
        (**self).retrying(identifier, attempt, delay);
    }
    fn verifying(&self, identifier: &str) {
        (**self).verifying(identifier);
    }
    fn done(&self, identifier: &str, detail: Option<&str>) {
        (**self).done(identifier, detail);
    }
    fn failed(&self, identifier: &str, reason: &str) {
        (**self).failed(identifier, reason);
    }
}

/// A no-op reporter for silent operations (e.g., `--quiet`, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn detected(&self, _: &str, _: Ecosystem) {}
    fn installing(&self, _: &str, _: Ecosystem) {}
    fn downloading(&self, _: &str, _: u64, _: Option<u64>) {}
    fn retrying(&self, _: &str, _: u32, _: Duration) {}
    fn verifying(&self, _: &str) {}
    fn done(&self, _: &str, _: Option<&str>) {}
    fn failed(&self, _: &str, _: &str) {}
}
