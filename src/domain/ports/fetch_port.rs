//! Remote asset download port.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Port for retrieving the raw bytes of a remote asset.
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Downloads the asset at `url` in a single attempt.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Mock fetch port returning canned bytes or a canned failure.
    pub struct MockFetchPort {
        response: Mutex<Result<Bytes, u16>>,
        pub requested_urls: Arc<Mutex<Vec<String>>>,
    }

    impl MockFetchPort {
        /// Mock that serves the given bytes for every URL.
        pub fn serving(bytes: impl Into<Bytes>) -> Self {
            Self {
                response: Mutex::new(Ok(bytes.into())),
                requested_urls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Mock that fails every fetch with the given HTTP status.
        pub fn failing(status: u16) -> Self {
            Self {
                response: Mutex::new(Err(status)),
                requested_urls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl FetchPort for MockFetchPort {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.requested_urls.lock().push(url.to_string());
            match &*self.response.lock() {
                Ok(bytes) => Ok(bytes.clone()),
                Err(status) => Err(FetchError::status(*status)),
            }
        }
    }
}
