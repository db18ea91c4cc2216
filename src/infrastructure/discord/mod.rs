//! Discord REST and gateway adapters.

mod client;
mod dto;
pub mod gateway;

pub use client::DiscordRestClient;
pub use gateway::{GatewayClient, GatewayError, GatewayIntents};
