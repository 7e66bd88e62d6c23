//! Per-ecosystem installers.
//!
//! Each installer services exactly one [`Ecosystem`]. `Ok(detail)` is the
//! only way to a successful outcome; `detail` carries anything the caller
//! should know about the result (e.g. where a release asset was cached).

pub mod npm;
pub mod release;
pub mod subprocess;

use anypm_schema::{Ecosystem, PackageRequest};
use async_trait::async_trait;

use crate::error::InstallFailure;

pub use npm::NpmInstaller;
pub use release::ReleaseInstaller;
pub use subprocess::SubprocessInstaller;

#[async_trait]
pub trait Installer: Send + Sync {
    /// The ecosystem this installer services.
    fn ecosystem(&self) -> Ecosystem;

    /// Install one request.
    ///
    /// # Errors
    ///
    /// Returns the failure that ends this request. It never affects other
    /// requests in the batch.
    async fn install(&self, request: &PackageRequest) -> Result<Option<String>, InstallFailure>;
}
