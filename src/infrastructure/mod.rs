//! Infrastructure layer with external service adapters.

/// Bot configuration.
pub mod config;
/// Discord REST and gateway adapters.
pub mod discord;
/// HTTP attachment fetching.
pub mod http;
/// Control message persistence.
pub mod state_store;

pub use config::{BotConfig, LogLevel};
pub use discord::{DiscordRestClient, GatewayClient, GatewayIntents};
pub use http::AssetFetcher;
pub use state_store::{BotState, StateStore};
