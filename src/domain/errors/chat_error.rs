//! Chat transport error types.

use thiserror::Error;

/// Failure talking to the Discord REST API.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Could not reach the API at all.
    #[error("network error: {message}")]
    Network {
        /// Underlying transport failure.
        message: String,
    },

    /// The API rejected the request.
    #[error("Discord API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, if any.
        message: String,
    },

    /// The response body could not be parsed.
    #[error("malformed API response: {message}")]
    Malformed {
        /// What failed to parse.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    ClientBuild {
        /// Builder failure.
        message: String,
    },
}

impl ChatError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a client-build error.
    #[must_use]
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Returns whether the failure was the resource not existing.
    ///
    /// Deleting an already-gone control message is not an error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ChatError::api(404, "Unknown Message").is_not_found());
        assert!(!ChatError::api(403, "Missing Access").is_not_found());
        assert!(!ChatError::network("timed out").is_not_found());
    }
}
