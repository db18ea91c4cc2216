//! Snowflake identifier newtypes.

use serde::{Deserialize, Serialize};

macro_rules! snowflake_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the underlying u64 value.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Parses a snowflake from its decimal string form.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                value.parse().ok().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake_id!(
    /// Unique identifier for a Discord user.
    UserId
);
snowflake_id!(
    /// Unique identifier for a Discord channel.
    ChannelId
);
snowflake_id!(
    /// Unique identifier for a Discord message.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_snowflake() {
        assert_eq!(UserId::parse("80351110224678912"), Some(UserId(80_351_110_224_678_912)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(MessageId::parse("not-a-number"), None);
        assert_eq!(ChannelId::parse(""), None);
    }

    #[test]
    fn test_display_roundtrip() {
        let id = MessageId(42);
        assert_eq!(MessageId::parse(&id.to_string()), Some(id));
    }
}
