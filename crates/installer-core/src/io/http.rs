//! HTTP capability: fetch-to-memory and fetch-to-file.
//!
//! Any non-success status fails the request; there is no partial-content
//! handling and no retry.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::ToolMode;
use crate::error::{InstallError, Result};
use crate::host::{Host, Invocation};

/// External download tools, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpTool {
    Curl,
    Wget,
}

impl HttpTool {
    pub const PREFERENCE: [Self; 2] = [Self::Curl, Self::Wget];

    pub fn program(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }

    fn text_invocation(&self, url: &str) -> Invocation {
        match self {
            Self::Curl => Invocation::new("curl").args(["-fsSL", url]),
            Self::Wget => Invocation::new("wget").args(["-qO-", url]),
        }
    }

    fn file_invocation(&self, url: &str, dest: &Path) -> Invocation {
        match self {
            Self::Curl => Invocation::new("curl")
                .args(["-fsSL", "-o"])
                .arg(dest)
                .arg(url),
            Self::Wget => Invocation::new("wget").args(["-q", "-O"]).arg(dest).arg(url),
        }
    }
}

#[derive(Clone)]
pub enum HttpClient {
    /// In-process client.
    Native(reqwest::Client),
    /// Shells out to `curl` or `wget`.
    System { tool: HttpTool, host: Arc<dyn Host> },
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.debug_tuple("Native").finish_non_exhaustive(),
            Self::System { tool, .. } => f
                .debug_struct("System")
                .field("tool", tool)
                .finish_non_exhaustive(),
        }
    }
}

impl HttpClient {
    /// Built-in client carrying the installer's User-Agent.
    pub fn native() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| {
                InstallError::MissingDependency(format!("failed to initialize HTTP client: {e}"))
            })?;
        Ok(Self::Native(client))
    }

    /// Pick the HTTP backend for `mode`. In system mode `curl` wins over
    /// `wget`, and having neither is fatal.
    pub fn detect(mode: ToolMode, host: Arc<dyn Host>) -> Result<Self> {
        match mode {
            ToolMode::Native => Self::native(),
            ToolMode::System => {
                let tool = HttpTool::PREFERENCE
                    .into_iter()
                    .find(|t| host.has_command(t.program()))
                    .ok_or_else(|| {
                        InstallError::MissingDependency(
                            "either curl or wget is required".to_string(),
                        )
                    })?;
                info!(tool = tool.program(), "using system HTTP client");
                Ok(Self::System { tool, host })
            }
        }
    }

    /// GET `url` and return the body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching");
        match self {
            Self::Native(client) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| download_error(url, e))?;
                response.text().await.map_err(|e| download_error(url, e))
            }
            Self::System { tool, host } => host
                .output(&tool.text_invocation(url))
                .map_err(|e| download_error(url, e)),
        }
    }

    /// GET `url` and stream the body into `dest`, replacing any existing file.
    pub async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(%url, dest = %dest.display(), "downloading");
        match self {
            Self::Native(client) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| download_error(url, e))?;

                let mut file = File::create(dest).await?;
                let mut stream = response.bytes_stream();
                let mut downloaded: u64 = 0;

                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(|e| download_error(url, e))?;
                    file.write_all(&chunk).await?;
                    downloaded += chunk.len() as u64;
                }

                file.flush().await?;
                debug!(bytes = downloaded, "download complete");
                Ok(())
            }
            Self::System { tool, host } => host
                .run(&tool.file_invocation(url, dest))
                .map_err(|e| download_error(url, e)),
        }
    }
}

fn download_error(url: &str, reason: impl fmt::Display) -> InstallError {
    InstallError::Download {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_text_returns_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/latest")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let client = HttpClient::native().unwrap();
        let body = client
            .fetch_text(&format!("{}/latest", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn non_success_status_is_fatal() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::native().unwrap();
        let url = format!("{}/missing.zip", server.url());
        let err = client
            .fetch_to_file(&url, &dir.path().join("missing.zip"))
            .await
            .unwrap_err();

        match err {
            InstallError::Download { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_to_file_writes_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/asset.zip")
            .with_status(200)
            .with_body(b"PK\x03\x04payload".as_slice())
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("asset.zip");
        HttpClient::native()
            .unwrap()
            .fetch_to_file(&format!("{}/asset.zip", server.url()), &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"PK\x03\x04payload");
    }

    #[test]
    fn system_mode_prefers_curl() {
        let host: Arc<dyn Host> = Arc::new(FakeHost::new().with_commands(&["wget", "curl"]));
        let client = HttpClient::detect(ToolMode::System, host).unwrap();
        assert!(matches!(client, HttpClient::System { tool: HttpTool::Curl, .. }));
    }

    #[test]
    fn system_mode_falls_back_to_wget() {
        let host: Arc<dyn Host> = Arc::new(FakeHost::new().with_commands(&["wget"]));
        let client = HttpClient::detect(ToolMode::System, host).unwrap();
        assert!(matches!(client, HttpClient::System { tool: HttpTool::Wget, .. }));
    }

    #[test]
    fn system_mode_without_tools_is_fatal() {
        let host: Arc<dyn Host> = Arc::new(FakeHost::new());
        let err = HttpClient::detect(ToolMode::System, host).unwrap_err();
        assert_eq!(err.to_string(), "either curl or wget is required");
    }

    #[tokio::test]
    async fn curl_downloads_to_path() {
        let fake = Arc::new(FakeHost::new().with_commands(&["curl"]));
        let client = HttpClient::detect(ToolMode::System, fake.clone()).unwrap();
        client
            .fetch_to_file("https://example.com/a.zip", Path::new("/tmp/ws/a.zip"))
            .await
            .unwrap();
        assert_eq!(
            fake.calls(),
            vec!["curl -fsSL -o /tmp/ws/a.zip https://example.com/a.zip"]
        );
    }
}
