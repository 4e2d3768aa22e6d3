//! Fetch capability for release archives.
//!
//! The fetch step is behind a trait so tests can substitute in-memory
//! payloads instead of hitting the network.

use async_trait::async_trait;

use crate::http::{HttpClient, HttpClientConfig};
use crate::{InstallError, Result};

/// Progress callback: (downloaded bytes, total bytes or 0 if unknown)
pub type Progress = dyn Fn(u64, u64) + Send + Sync;

/// Capability to fetch the complete byte payload of a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, progress: Option<&Progress>) -> Result<Vec<u8>>;
}

/// HTTP fetcher backed by [`HttpClient`]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = HttpClient::with_config(config).map_err(|e| InstallError::FetchFailed {
            url: String::new(),
            reason: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, progress: Option<&Progress>) -> Result<Vec<u8>> {
        log::debug!("fetching {}", url);

        self.client
            .download_bytes(url, progress.map(|p| move |d, t| p(d, t)))
            .await
            .map_err(|e| InstallError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}
