//! Discord gateway (WebSocket) client.

mod client;
mod connection;
mod constants;
mod error;
mod events;
mod heartbeat;
mod payloads;

pub use client::GatewayClient;
pub use constants::{GatewayIntent, GatewayIntents, GatewayOpcode};
pub use error::{GatewayError, GatewayResult};
