//! Domain error types.

mod chat_error;
mod fetch_error;
mod transcode_error;

pub use chat_error::ChatError;
pub use fetch_error::FetchError;
pub use transcode_error::TranscodeError;
