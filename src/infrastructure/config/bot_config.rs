use std::path::PathBuf;

use clap::Parser;

use crate::domain::entities::ChannelId;

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Bot configuration from CLI flags and environment.
#[derive(Debug, Parser)]
#[command(
    name = "pixicord",
    version,
    about = "A Discord bot that resizes uploaded images on demand",
    long_about = None
)]
pub struct BotConfig {
    /// Bot token used for both the REST API and the gateway.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channel where the resolution control message lives.
    #[arg(long, env = "CONTROL_CHANNEL_ID", value_parser = parse_channel_id)]
    pub control_channel: ChannelId,

    /// Log verbosity level.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log file path. Logs go to stderr when unset.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// State file path, overriding the platform default.
    #[arg(long, value_name = "PATH")]
    pub state_path: Option<PathBuf>,
}

fn parse_channel_id(value: &str) -> Result<ChannelId, String> {
    ChannelId::parse(value).ok_or_else(|| format!("'{value}' is not a valid channel id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_id() {
        assert_eq!(
            parse_channel_id("123456789012345678"),
            Ok(ChannelId::from(123_456_789_012_345_678))
        );
        assert!(parse_channel_id("not-a-snowflake").is_err());
    }

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::default().to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_from_args() {
        let config = BotConfig::parse_from([
            "pixicord",
            "--token",
            "Bot.Token.Here",
            "--control-channel",
            "42",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.control_channel, ChannelId::from(42));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.log_path.is_none());
    }
}
