//! Outbound chat transport port.

use async_trait::async_trait;

use crate::domain::entities::{ChannelId, MessageId, ResizeOutcome, UserId};
use crate::domain::errors::ChatError;

/// Port for sending messages, reactions, and attachments to Discord.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Posts a message to a channel, returning its ID.
    async fn post_message(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<MessageId, ChatError>;

    /// Deletes a message from a channel.
    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ChatError>;

    /// Adds a reaction emoji to a message as the bot.
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), ChatError>;

    /// Sends a direct message to a user.
    async fn send_direct(&self, user_id: UserId, content: &str) -> Result<(), ChatError>;

    /// Sends a direct message carrying a resized asset as an attachment.
    async fn send_direct_file(
        &self,
        user_id: UserId,
        content: &str,
        outcome: &ResizeOutcome,
    ) -> Result<(), ChatError>;
}
