//! Control message bootstrap.
//!
//! The bot owns one persistent message bearing the gesture reactions. On
//! startup the previous one (if its ID survived in the state file) is
//! removed and a fresh one is posted and seeded.

use tracing::{debug, info, warn};

use crate::domain::entities::{ChannelId, MessageId, TargetResolution};
use crate::domain::errors::ChatError;
use crate::domain::ports::ChatPort;

/// Body of the persistent control message.
pub const CONTROL_MESSAGE_TEXT: &str = "\
React to pick your output resolution, then DM me an image:\n\
1\u{fe0f}\u{20e3} 240x135   2\u{fe0f}\u{20e3} 320x170   3\u{fe0f}\u{20e3} 320x240";

/// Replaces the previous control message with a freshly seeded one.
///
/// Absence of the old message is not an error; any other delete failure is
/// logged and ignored.
///
/// # Errors
/// Returns an error if posting the new message or seeding its reactions
/// fails.
pub async fn ensure_control_message(
    chat: &dyn ChatPort,
    channel_id: ChannelId,
    previous: Option<MessageId>,
) -> Result<MessageId, ChatError> {
    if let Some(old_id) = previous {
        match chat.delete_message(channel_id, old_id).await {
            Ok(()) => debug!(message_id = %old_id, "Removed previous control message"),
            Err(e) if e.is_not_found() => {
                debug!(message_id = %old_id, "Previous control message already gone");
            }
            Err(e) => {
                warn!(message_id = %old_id, error = %e, "Failed to remove previous control message");
            }
        }
    }

    let message_id = chat.post_message(channel_id, CONTROL_MESSAGE_TEXT).await?;

    for resolution in TargetResolution::ALL {
        chat.add_reaction(channel_id, message_id, resolution.gesture())
            .await?;
    }

    info!(channel_id = %channel_id, message_id = %message_id, "Control message ready");
    Ok(message_id)
}
