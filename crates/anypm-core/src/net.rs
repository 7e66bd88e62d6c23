//! Network transport.
//!
//! All HTTP access goes through [`Transport`]. Callers apply their own
//! bounded waits with `tokio::time::timeout`, so a fake transport in tests is
//! subject to exactly the same timeout policy as the real one.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::NetError;
use crate::settings::Settings;

/// Progress callback: bytes written so far, and the total if known.
pub type Progress<'a> = &'a (dyn Fn(u64, Option<u64>) + Send + Sync);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Read-only existence check. `Ok(true)` for a success status,
    /// `Ok(false)` for any other status.
    async fn probe(&self, url: &str) -> Result<bool, NetError>;

    /// Fetch the body of a successful response as text.
    async fn get_text(&self, url: &str) -> Result<String, NetError>;

    /// Stream the body of a successful response into `dest`, replacing any
    /// existing file. Returns the number of bytes written.
    async fn download(&self, url: &str, dest: &Path, progress: Progress<'_>)
    -> Result<u64, NetError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_base: Option<Url>,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport from settings. The GitHub token, if any, is only
    /// attached to requests addressed to the configured API base.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(settings: &Settings) -> Result<Self, NetError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_base: Url::parse(&settings.github_api).ok(),
            token: settings.github_token.clone(),
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let req = self.client.get(url);
        match (&self.token, &self.api_base) {
            (Some(token), Some(base)) if in_token_scope(base, url) => req.bearer_auth(token),
            _ => req,
        }
    }
}

/// Whether `url` is on the same origin as `base` and at or below its path.
/// Path matching stops at segment boundaries, so `/api/v3` does not cover
/// `/api/v30`.
fn in_token_scope(base: &Url, url: &str) -> bool {
    let Ok(target) = Url::parse(url) else {
        return false;
    };
    if target.scheme() != base.scheme()
        || target.host_str() != base.host_str()
        || target.port_or_known_default() != base.port_or_known_default()
    {
        return false;
    }

    let prefix = base.path().trim_end_matches('/');
    prefix.is_empty()
        || target
            .path()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn check_status(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, NetError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(NetError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &str) -> Result<bool, NetError> {
        let resp = self.get(url).send().await?;
        tracing::debug!(url, status = resp.status().as_u16(), "probe");
        Ok(resp.status().is_success())
    }

    async fn get_text(&self, url: &str) -> Result<String, NetError> {
        let resp = check_status(self.get(url).send().await?, url)?;
        Ok(resp.text().await?)
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Progress<'_>,
    ) -> Result<u64, NetError> {
        let response = check_status(self.get(url).send().await?, url)?;
        let total = response.content_length();

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress(downloaded, total);
        }

        file.flush().await?;
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    fn transport_for(server: &Server, token: Option<&str>) -> HttpTransport {
        let mut settings = Settings::new("/h", "/p");
        settings.github_api = server.url();
        settings.github_token = token.map(str::to_string);
        HttpTransport::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_probe_maps_status_to_bool() {
        let mut server = Server::new_async().await;
        let _found = server
            .mock("GET", "/repos/acme/tool")
            .with_status(200)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/repos/acme/nope")
            .with_status(404)
            .create_async()
            .await;

        let t = transport_for(&server, None);
        assert!(t.probe(&format!("{}/repos/acme/tool", server.url())).await.unwrap());
        assert!(!t.probe(&format!("{}/repos/acme/nope", server.url())).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_text_rejects_error_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let t = transport_for(&server, None);
        let err = t.get_text(&format!("{}/missing", server.url())).await.unwrap_err();
        assert!(matches!(err, NetError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_token_sent_to_api_base() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/repos/acme/tool")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .create_async()
            .await;

        let t = transport_for(&server, Some("s3cret"));
        assert!(t.probe(&format!("{}/repos/acme/tool", server.url())).await.unwrap());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_withheld_from_neighbouring_port() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/x")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        // Base `http://127.0.0.1:3655` must not cover `http://127.0.0.1:36553`.
        let url = server.url();
        let mut settings = Settings::new("/h", "/p");
        settings.github_api = url[..url.len() - 1].to_string();
        settings.github_token = Some("s3cret".to_string());
        let t = HttpTransport::new(&settings).unwrap();

        assert!(t.probe(&format!("{url}/x")).await.unwrap());
        m.assert_async().await;
    }

    #[test]
    fn test_token_scope() {
        let api = Url::parse("https://api.github.com").unwrap();
        assert!(in_token_scope(&api, "https://api.github.com/repos/acme/tool"));
        assert!(!in_token_scope(&api, "https://api.github.com.evil.example/repos/acme/tool"));
        assert!(!in_token_scope(&api, "http://api.github.com/repos/acme/tool"));
        assert!(!in_token_scope(&api, "https://api.github.com:8443/repos"));
        assert!(!in_token_scope(&api, "https://objects.githubusercontent.com/tool.tar.gz"));
        assert!(!in_token_scope(&api, "not a url"));

        let local = Url::parse("http://127.0.0.1:3655").unwrap();
        assert!(!in_token_scope(&local, "http://127.0.0.1:36553/x"));

        let ghe = Url::parse("https://ghe.example/api/v3/").unwrap();
        assert!(in_token_scope(&ghe, "https://ghe.example/api/v3/repos/a/b"));
        assert!(in_token_scope(&ghe, "https://ghe.example/api/v3"));
        assert!(!in_token_scope(&ghe, "https://ghe.example/api/v30/repos"));
        assert!(!in_token_scope(&ghe, "https://ghe.example/raw/a/b"));
    }

    #[tokio::test]
    async fn test_download_streams_to_file() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tool.tar.gz")
            .with_status(200)
            .with_body(vec![7u8; 4096])
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("tool.tar.gz");
        let seen = std::sync::atomic::AtomicU64::new(0);
        let progress = |current: u64, _total: Option<u64>| {
            seen.store(current, std::sync::atomic::Ordering::SeqCst);
        };

        let t = transport_for(&server, None);
        let written = t
            .download(&format!("{}/tool.tar.gz", server.url()), &dest, &progress)
            .await
            .unwrap();

        assert_eq!(written, 4096);
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 4096);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 4096);
    }
}
