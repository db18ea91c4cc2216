use std::time::Duration;

pub const GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

pub const HEARTBEAT_JITTER_PERCENT: f64 = 0.05;

pub const RECONNECT_DELAY_BASE: Duration = Duration::from_secs(1);
pub const RECONNECT_DELAY_MAX: Duration = Duration::from_secs(60);
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
pub const HELLO_TIMEOUT: Duration = Duration::from_secs(10);
pub const IDENTIFY_TIMEOUT: Duration = Duration::from_secs(10);

pub const CLIENT_PROPERTIES_OS: &str = "Linux";
pub const CLIENT_PROPERTIES_BROWSER: &str = "pixicord";
pub const CLIENT_PROPERTIES_DEVICE: &str = "pixicord";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOpcode {
    Dispatch = 0,
    Heartbeat = 1,
    Identify = 2,
    Reconnect = 7,
    InvalidSession = 9,
    Hello = 10,
    HeartbeatAck = 11,
}

impl GatewayOpcode {
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Dispatch),
            1 => Some(Self::Heartbeat),
            2 => Some(Self::Identify),
            7 => Some(Self::Reconnect),
            9 => Some(Self::InvalidSession),
            10 => Some(Self::Hello),
            11 => Some(Self::HeartbeatAck),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayIntent {
    GuildMessages = 1 << 9,
    GuildMessageReactions = 1 << 10,
    DirectMessages = 1 << 12,
    DirectMessageReactions = 1 << 13,
    MessageContent = 1 << 15,
}

impl GatewayIntent {
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayIntents(u32);

impl GatewayIntents {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(mut self, intent: GatewayIntent) -> Self {
        self.0 |= intent.as_u32();
        self
    }

    #[must_use]
    pub const fn has(self, intent: GatewayIntent) -> bool {
        (self.0 & intent.as_u32()) != 0
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Everything the resize flow needs: messages, reactions, attachments.
    #[must_use]
    pub const fn resize_bot() -> Self {
        Self::new()
            .with(GatewayIntent::GuildMessages)
            .with(GatewayIntent::GuildMessageReactions)
            .with(GatewayIntent::DirectMessages)
            .with(GatewayIntent::DirectMessageReactions)
            .with(GatewayIntent::MessageContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for opcode in [
            GatewayOpcode::Dispatch,
            GatewayOpcode::Heartbeat,
            GatewayOpcode::Identify,
            GatewayOpcode::Hello,
            GatewayOpcode::HeartbeatAck,
        ] {
            assert_eq!(GatewayOpcode::from_u8(opcode.as_u8()), Some(opcode));
        }
    }

    #[test]
    fn test_resize_bot_intents() {
        let intents = GatewayIntents::resize_bot();
        assert!(intents.has(GatewayIntent::GuildMessageReactions));
        assert!(intents.has(GatewayIntent::MessageContent));
        let expected = (1 << 9) | (1 << 10) | (1 << 12) | (1 << 13) | (1 << 15);
        assert_eq!(intents.as_u32(), expected);
    }
}
