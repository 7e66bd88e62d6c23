//! Download with linear-backoff retry.
//!
//! The retry loop is an explicit state machine: each failed attempt records
//! its error, then suspends on `tokio::time::sleep` for `base_delay * attempt`
//! before the next one. The attempt budget includes the first try.

use std::path::Path;
use std::time::Duration;

use crate::error::{InstallFailure, NetError};
use crate::net::{Progress, Transport};

/// Retry budget and backoff for release downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than one.
    pub max_attempts: u32,
    /// Wait after the first failure; later waits grow linearly.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

#[derive(Debug, Default)]
struct RetryState {
    attempt: u32,
    last_error: Option<NetError>,
}

/// Download `url` into `dest`, retrying transport failures.
///
/// `on_retry` is told the failed attempt number and the wait before the next
/// one. Once the transport reports success, the file is checked
/// independently: an empty or missing file is a failure even if the stream
/// completed cleanly.
///
/// # Errors
///
/// [`InstallFailure::DownloadFailed`] once the attempt budget is exhausted,
/// [`InstallFailure::TruncatedDownload`] if the reported success left no bytes.
pub async fn download_with_retry(
    transport: &dyn Transport,
    url: &str,
    dest: &Path,
    policy: RetryPolicy,
    progress: Progress<'_>,
    on_retry: &(dyn Fn(u32, Duration) + Send + Sync),
) -> Result<u64, InstallFailure> {
    let max_attempts = policy.max_attempts.max(1);
    let mut state = RetryState::default();

    let written = loop {
        state.attempt += 1;
        match transport.download(url, dest, progress).await {
            Ok(written) => break written,
            Err(e) => {
                tracing::warn!(url, attempt = state.attempt, error = %e, "download attempt failed");
                state.last_error = Some(e);
                if state.attempt >= max_attempts {
                    tracing::warn!(
                        url,
                        attempts = state.attempt,
                        last_error = ?state.last_error,
                        "download attempts exhausted"
                    );
                    return Err(InstallFailure::DownloadFailed);
                }
                let delay = policy.delay_after(state.attempt);
                on_retry(state.attempt, delay);
                tokio::time::sleep(delay).await;
            }
        }
    };

    match tokio::fs::metadata(dest).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {
            tracing::debug!(url, reported = written, on_disk = meta.len(), "download complete");
            Ok(meta.len())
        }
        Ok(meta) => {
            tracing::warn!(url, reported = written, on_disk = meta.len(), "download left an empty file");
            Err(InstallFailure::TruncatedDownload)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "download left no file");
            Err(InstallFailure::TruncatedDownload)
        }
    }
}
