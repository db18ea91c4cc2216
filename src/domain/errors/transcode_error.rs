//! Transcoding error types.

use thiserror::Error;

/// Failure turning fetched bytes into a resized output asset.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The bytes do not parse as a supported image.
    #[error("could not decode image: {message}")]
    Decode {
        /// Underlying decoder failure.
        message: String,
    },

    /// Re-encoding the resized asset failed.
    #[error("could not encode output: {message}")]
    Encode {
        /// Underlying encoder failure.
        message: String,
    },
}

impl TranscodeError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for TranscodeError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::Encoding(e) => Self::encode(e.to_string()),
            other => Self::decode(other.to_string()),
        }
    }
}
