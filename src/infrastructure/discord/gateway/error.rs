use thiserror::Error;

use super::constants::GatewayOpcode;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("connection closed with code {code}: {reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("websocket error: {message}")]
    WebSocket { message: String },

    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("session invalidated by gateway")]
    SessionInvalidated,

    #[error("reconnection limit exceeded after {attempts} attempts")]
    ReconnectionLimitExceeded { attempts: u32 },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("protocol error: unexpected opcode {opcode:?}")]
    UnexpectedOpcode { opcode: Option<GatewayOpcode> },

    #[error("protocol error: {message}")]
    ProtocolError { message: String },

    #[error("timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("not connected to gateway")]
    NotConnected,
}

impl GatewayError {
    #[must_use]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn websocket(message: impl Into<String>) -> Self {
        Self::WebSocket {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Whether the run loop should tear down and reconnect.
    #[must_use]
    pub const fn should_reconnect(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::ConnectionClosed { .. }
                | Self::WebSocket { .. }
                | Self::SessionInvalidated
                | Self::Timeout { .. }
        )
    }

    /// Discord closes with 4004 when the token is bad; retrying is pointless.
    #[must_use]
    pub const fn is_fatal_close(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed {
                code: 4004 | 4010..=4014,
                ..
            } | Self::AuthenticationFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_policy() {
        assert!(GatewayError::connection_failed("x").should_reconnect());
        assert!(GatewayError::SessionInvalidated.should_reconnect());
        assert!(!GatewayError::auth_failed("bad token").should_reconnect());
        assert!(!GatewayError::NotConnected.should_reconnect());

        // Giving up after the attempt budget must not loop back into retry.
        let exhausted = GatewayError::ReconnectionLimitExceeded { attempts: 10 };
        assert!(!exhausted.should_reconnect());
        assert_eq!(
            exhausted.to_string(),
            "reconnection limit exceeded after 10 attempts"
        );
    }

    #[test]
    fn test_fatal_close_codes() {
        let bad_auth = GatewayError::ConnectionClosed {
            code: 4004,
            reason: "Authentication failed.".to_string(),
        };
        assert!(bad_auth.is_fatal_close());

        let flaky = GatewayError::ConnectionClosed {
            code: 1006,
            reason: "abnormal".to_string(),
        };
        assert!(!flaky.is_fatal_close());
    }
}
