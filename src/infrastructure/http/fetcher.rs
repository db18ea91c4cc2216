//! HTTP asset fetcher.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::FetchPort;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Downloads attachment bytes from the CDN.
///
/// A failed attempt is not retried; the failure is surfaced to the user as
/// a download-failure notification.
pub struct AssetFetcher {
    client: Client,
}

impl AssetFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::transfer(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchPort for AssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        debug!(url = %url, "Downloading attachment");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Attachment request failed");
            if e.is_timeout() {
                FetchError::transfer("request timed out")
            } else {
                FetchError::transfer(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::transfer(format!("failed to read body: {e}")))?;

        debug!(url = %url, bytes = bytes.len(), "Attachment downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(AssetFetcher::new().is_ok());
    }
}
