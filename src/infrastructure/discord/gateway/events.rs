//! Dispatch payload -> domain event parsing.

use serde_json::Value;
use tracing::trace;

use super::payloads::{MessageCreatePayload, ReactionAddPayload, ReadyPayload};
use crate::domain::entities::{ChannelId, MessageId, UserId};
use crate::domain::ports::{AttachmentRef, ChatEvent};

/// Parses one dispatch event into a [`ChatEvent`].
///
/// Event types the resize flow does not care about, and payloads that do
/// not deserialize, map to `None` and are dropped.
#[must_use]
pub fn parse_dispatch(event_type: &str, data: Option<Value>) -> Option<ChatEvent> {
    let data = data?;

    match event_type {
        "READY" => {
            let ready: ReadyPayload = serde_json::from_value(data).ok()?;
            Some(ChatEvent::Ready {
                user_id: UserId::parse(&ready.user.id)?,
            })
        }
        "MESSAGE_CREATE" => {
            let message: MessageCreatePayload = serde_json::from_value(data).ok()?;
            Some(ChatEvent::MessageCreated {
                channel_id: ChannelId::parse(&message.channel_id)?,
                author_id: UserId::parse(&message.author.id)?,
                author_is_bot: message.author.bot,
                attachments: message
                    .attachments
                    .into_iter()
                    .map(|a| AttachmentRef {
                        url: a.url,
                        filename: a.filename,
                    })
                    .collect(),
            })
        }
        "MESSAGE_REACTION_ADD" => {
            let reaction: ReactionAddPayload = serde_json::from_value(data).ok()?;
            Some(ChatEvent::ReactionAdded {
                channel_id: ChannelId::parse(&reaction.channel_id)?,
                message_id: MessageId::parse(&reaction.message_id)?,
                user_id: UserId::parse(&reaction.user_id)?,
                emoji: reaction.emoji.name?,
            })
        }
        other => {
            trace!(event = other, "Ignoring dispatch event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ready() {
        let data = json!({ "user": { "id": "111" }, "session_id": "abc" });
        let event = parse_dispatch("READY", Some(data)).expect("parsed");
        assert!(matches!(event, ChatEvent::Ready { user_id } if user_id == UserId(111)));
    }

    #[test]
    fn test_parse_message_create_with_attachment() {
        let data = json!({
            "channel_id": "200",
            "author": { "id": "42", "bot": false },
            "attachments": [
                { "url": "https://cdn.discordapp.com/a/upload.png", "filename": "upload.png" }
            ]
        });

        let event = parse_dispatch("MESSAGE_CREATE", Some(data)).expect("parsed");
        let ChatEvent::MessageCreated {
            channel_id,
            author_id,
            author_is_bot,
            attachments,
        } = event
        else {
            panic!("wrong event kind");
        };

        assert_eq!(channel_id, ChannelId(200));
        assert_eq!(author_id, UserId(42));
        assert!(!author_is_bot);
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "upload.png");
    }

    #[test]
    fn test_parse_message_create_defaults_missing_fields() {
        // No attachments array, no bot flag.
        let data = json!({ "channel_id": "200", "author": { "id": "42" } });
        let event = parse_dispatch("MESSAGE_CREATE", Some(data)).expect("parsed");
        let ChatEvent::MessageCreated {
            attachments,
            author_is_bot,
            ..
        } = event
        else {
            panic!("wrong event kind");
        };
        assert!(attachments.is_empty());
        assert!(!author_is_bot);
    }

    #[test]
    fn test_parse_reaction_add() {
        let data = json!({
            "user_id": "42",
            "channel_id": "200",
            "message_id": "300",
            "emoji": { "id": null, "name": "2\u{fe0f}\u{20e3}" }
        });

        let event = parse_dispatch("MESSAGE_REACTION_ADD", Some(data)).expect("parsed");
        let ChatEvent::ReactionAdded {
            message_id, emoji, ..
        } = event
        else {
            panic!("wrong event kind");
        };
        assert_eq!(message_id, MessageId(300));
        assert_eq!(emoji, "2\u{fe0f}\u{20e3}");
    }

    #[test]
    fn test_custom_emoji_without_name_is_dropped() {
        let data = json!({
            "user_id": "42",
            "channel_id": "200",
            "message_id": "300",
            "emoji": { "id": "555", "name": null }
        });
        assert!(parse_dispatch("MESSAGE_REACTION_ADD", Some(data)).is_none());
    }

    #[test]
    fn test_unknown_event_is_dropped() {
        assert!(parse_dispatch("TYPING_START", Some(json!({}))).is_none());
        assert!(parse_dispatch("MESSAGE_CREATE", None).is_none());
    }
}
