//! Core library for anypm.
//!
//! Turns raw identifiers into install outcomes:
//!
//! ```text
//! raw identifier --[spec::parse]--> PackageRequest
//!                --[Detector::detect]--> Ecosystem
//!                --[Dispatcher::dispatch]--> Installer::install --> InstallOutcome
//! ```
//!
//! Requests run strictly one at a time, in input order. Network access and
//! subprocess execution go through the [`Transport`] and [`CommandRunner`]
//! capabilities so that tests can substitute fakes.

pub mod batch;
pub mod context;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod fingerprint;
pub mod installers;
pub mod net;
pub mod paths;
pub mod process;
pub mod release;
pub mod reporter;
pub mod settings;
pub mod spec;

pub use batch::{Engine, OutcomeLog, PlannedRequest};
pub use context::Context;
pub use detect::Detector;
pub use dispatch::Dispatcher;
pub use error::{InstallFailure, NetError};
pub use installers::Installer;
pub use net::{HttpTransport, Transport};
pub use process::{CommandRunner, Invocation, ProcessStatus, SystemRunner};
pub use reporter::{NullReporter, Reporter};
pub use settings::{Settings, SettingsError};

/// User Agent string for outgoing HTTP requests
pub const USER_AGENT: &str = concat!("anypm/", env!("CARGO_PKG_VERSION"));
