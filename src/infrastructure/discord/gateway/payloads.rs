use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::{
    CLIENT_PROPERTIES_BROWSER, CLIENT_PROPERTIES_DEVICE, CLIENT_PROPERTIES_OS,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    pub d: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    #[must_use]
    pub fn heartbeat(sequence: Option<u64>) -> Self {
        Self {
            op: 1,
            d: sequence.map_or(Value::Null, |s| Value::Number(s.into())),
            s: None,
            t: None,
        }
    }

    #[must_use]
    pub fn identify(token: &str, intents: u32) -> Self {
        let identify = IdentifyData {
            token: token.to_string(),
            properties: IdentifyProperties {
                os: CLIENT_PROPERTIES_OS.to_string(),
                browser: CLIENT_PROPERTIES_BROWSER.to_string(),
                device: CLIENT_PROPERTIES_DEVICE.to_string(),
            },
            compress: false,
            intents,
        };

        Self {
            op: 2,
            d: serde_json::to_value(identify).unwrap_or(Value::Null),
            s: None,
            t: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct IdentifyData {
    token: String,
    properties: IdentifyProperties,
    compress: bool,
    intents: u32,
}

#[derive(Debug, Serialize)]
struct IdentifyProperties {
    os: String,
    browser: String,
    device: String,
}

#[derive(Debug, Deserialize)]
pub struct GatewayMessage {
    pub op: u8,
    pub d: Option<Value>,
    pub s: Option<u64>,
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HelloPayload {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReadyPayload {
    pub user: ReadyUser,
}

#[derive(Debug, Deserialize)]
pub struct ReadyUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageCreatePayload {
    pub channel_id: String,
    pub author: MessageAuthorPayload,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Deserialize)]
pub struct MessageAuthorPayload {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentPayload {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactionAddPayload {
    pub user_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub emoji: EmojiPayload,
}

#[derive(Debug, Deserialize)]
pub struct EmojiPayload {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_payload_shape() {
        let payload = GatewayPayload::identify("token-value", 0b1010);
        assert_eq!(payload.op, 2);
        assert_eq!(payload.d["token"], "token-value");
        assert_eq!(payload.d["intents"], 10);
        assert_eq!(payload.d["compress"], false);
    }

    #[test]
    fn test_heartbeat_payload_null_sequence() {
        let payload = GatewayPayload::heartbeat(None);
        assert_eq!(payload.op, 1);
        assert!(payload.d.is_null());

        let payload = GatewayPayload::heartbeat(Some(42));
        assert_eq!(payload.d, 42);
    }
}
