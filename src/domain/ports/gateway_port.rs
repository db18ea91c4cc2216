//! Inbound chat event definitions.
//!
//! The gateway adapter parses raw dispatch payloads into these typed events
//! so the dispatcher's state machine is testable without a live transport.

use crate::domain::entities::{ChannelId, MessageId, UserId};

/// Reference to an attachment on an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// CDN URL to download the attachment from.
    pub url: String,
    /// Original filename as uploaded.
    pub filename: String,
}

/// An inbound event from the chat transport.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Gateway handshake finished; the bot's own identity is known.
    Ready {
        /// The bot's own user ID.
        user_id: UserId,
    },

    /// A user added a reaction to a message.
    ReactionAdded {
        /// Channel the message lives in.
        channel_id: ChannelId,
        /// The reacted-on message.
        message_id: MessageId,
        /// The reacting user.
        user_id: UserId,
        /// Unicode emoji, as sent by the gateway.
        emoji: String,
    },

    /// A message was posted.
    MessageCreated {
        /// Channel the message was posted in.
        channel_id: ChannelId,
        /// The message author.
        author_id: UserId,
        /// Whether the author is a bot account.
        author_is_bot: bool,
        /// Attachments carried by the message.
        attachments: Vec<AttachmentRef>,
    },

    /// The gateway connection dropped.
    Disconnected {
        /// Human-readable reason.
        reason: String,
    },

    /// A reconnect attempt is starting.
    Reconnecting {
        /// 1-based attempt counter.
        attempt: u32,
    },
}

impl ChatEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::ReactionAdded { .. } => "reaction_added",
            Self::MessageCreated { .. } => "message_created",
            Self::Disconnected { .. } => "disconnected",
            Self::Reconnecting { .. } => "reconnecting",
        }
    }
}
