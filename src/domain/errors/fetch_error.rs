//! Download error types.

use thiserror::Error;

/// Failure retrieving a remote asset.
///
/// A failed fetch is never retried; the single attempt is surfaced to the
/// user as a download-failure notification.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport responded with a non-success status.
    #[error("download rejected with HTTP {status}")]
    Status {
        /// The HTTP status code received.
        status: u16,
    },

    /// The transfer could not complete.
    #[error("download failed: {message}")]
    Transfer {
        /// Underlying transport failure.
        message: String,
    },
}

impl FetchError {
    /// Creates a transfer error.
    #[must_use]
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status { status }
    }
}
