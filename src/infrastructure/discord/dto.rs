//! Discord REST API wire types.

use serde::{Deserialize, Serialize};

/// Minimal message object returned by create-message endpoints.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    /// Snowflake as a decimal string.
    pub id: String,
}

/// DM channel object returned by the open-DM endpoint.
#[derive(Debug, Deserialize)]
pub struct DmChannelResponse {
    /// Snowflake as a decimal string.
    pub id: String,
}

/// Error body the API attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
}

/// Body for posting a plain text message.
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    /// Message text.
    pub content: &'a str,
}

/// Body for opening (or reusing) a DM channel with a user.
#[derive(Debug, Serialize)]
pub struct CreateDmRequest {
    /// Recipient snowflake as a decimal string.
    pub recipient_id: String,
}

/// `payload_json` part of a multipart message-with-attachment upload.
#[derive(Debug, Serialize)]
pub struct AttachmentPayload<'a> {
    /// Message text accompanying the file.
    pub content: &'a str,
    /// Attachment descriptors, indexed to the `files[N]` parts.
    pub attachments: Vec<AttachmentDescriptor<'a>>,
}

/// One attachment descriptor inside [`AttachmentPayload`].
#[derive(Debug, Serialize)]
pub struct AttachmentDescriptor<'a> {
    /// Index matching the `files[N]` multipart part.
    pub id: u8,
    /// Filename presented to the recipient.
    pub filename: &'a str,
}
