use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::connection::WebSocketConnection;
use super::constants::{
    GatewayIntents, GatewayOpcode, HELLO_TIMEOUT, IDENTIFY_TIMEOUT, MAX_RECONNECT_ATTEMPTS,
    RECONNECT_DELAY_BASE, RECONNECT_DELAY_MAX,
};
use super::error::{GatewayError, GatewayResult};
use super::events::parse_dispatch;
use super::heartbeat::HeartbeatManager;
use super::payloads::{GatewayPayload, HelloPayload};
use crate::domain::ports::ChatEvent;

/// Long-lived gateway client: connects, identifies, heartbeats, and feeds
/// parsed [`ChatEvent`]s into the bot's event loop. Reconnects with
/// exponential backoff until the attempt budget runs out or the close is
/// fatal (bad token, bad intents).
pub struct GatewayClient {
    token: String,
    intents: GatewayIntents,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
}

impl GatewayClient {
    /// Creates a client with the resize bot's intents.
    #[must_use]
    pub fn new(token: String, event_tx: mpsc::UnboundedSender<ChatEvent>) -> Self {
        Self {
            token,
            intents: GatewayIntents::resize_bot(),
            event_tx,
        }
    }

    /// Spawns the connection loop.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut attempt: u32 = 0;

        loop {
            match self.run_connection(&mut attempt).await {
                Ok(()) => {
                    debug!("Event channel closed, gateway shutting down");
                    return;
                }
                Err(e) if e.is_fatal_close() => {
                    error!(error = %e, "Gateway closed fatally, giving up");
                    return;
                }
                Err(e) if e.should_reconnect() && attempt < MAX_RECONNECT_ATTEMPTS => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "Gateway dropped, reconnecting");

                    let _ = self.event_tx.send(ChatEvent::Disconnected {
                        reason: e.to_string(),
                    });
                    let _ = self.event_tx.send(ChatEvent::Reconnecting { attempt });

                    sleep(delay).await;
                }
                Err(e) => {
                    let error = if e.should_reconnect() {
                        GatewayError::ReconnectionLimitExceeded { attempts: attempt }
                    } else {
                        e
                    };
                    error!(error = %error, "Gateway unrecoverable");
                    let _ = self.event_tx.send(ChatEvent::Disconnected {
                        reason: error.to_string(),
                    });
                    return;
                }
            }
        }
    }

    /// One connection lifetime: handshake, then the receive/heartbeat loop.
    ///
    /// Returns `Ok(())` only when the event channel is gone (shutdown).
    async fn run_connection(&self, attempt: &mut u32) -> GatewayResult<()> {
        let mut connection = WebSocketConnection::new();
        connection.connect().await?;

        let hello = await_hello(&mut connection).await?;
        let heartbeat = HeartbeatManager::new(hello.heartbeat_interval);

        connection
            .send(&GatewayPayload::identify(&self.token, self.intents.as_u32()))
            .await?;

        self.await_ready(&mut connection, &heartbeat).await?;

        // A successful handshake resets the backoff budget.
        *attempt = 0;

        let (hb_tx, mut hb_rx) = mpsc::channel(8);
        let hb_handle = heartbeat.start(hb_tx);

        let result = loop {
            tokio::select! {
                received = connection.receive() => {
                    match received {
                        Ok(message) => {
                            if let Err(e) = self.handle_message(message, &heartbeat, &mut connection).await {
                                break Err(e);
                            }
                            if self.event_tx.is_closed() {
                                break Ok(());
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }

                Some(payload) = hb_rx.recv() => {
                    if let Err(e) = connection.send(&payload).await {
                        break Err(e);
                    }
                }
            }
        };

        heartbeat.stop();
        hb_handle.abort();
        connection.disconnect().await;
        result
    }

    async fn await_ready(
        &self,
        connection: &mut WebSocketConnection,
        heartbeat: &HeartbeatManager,
    ) -> GatewayResult<()> {
        loop {
            let message = timeout(IDENTIFY_TIMEOUT, connection.receive())
                .await
                .map_err(|_| GatewayError::timeout("Ready"))??;

            if let Some(seq) = message.s {
                heartbeat.update_sequence(seq);
            }

            match GatewayOpcode::from_u8(message.op) {
                Some(GatewayOpcode::Dispatch) if message.t.as_deref() == Some("READY") => {
                    if let Some(event) = parse_dispatch("READY", message.d) {
                        info!("Gateway ready");
                        let _ = self.event_tx.send(event);
                    }
                    return Ok(());
                }
                Some(GatewayOpcode::InvalidSession) => {
                    return Err(GatewayError::auth_failed("session invalidated during identify"));
                }
                _ => {
                    debug!(op = message.op, "Skipping pre-ready message");
                }
            }
        }
    }

    async fn handle_message(
        &self,
        message: super::payloads::GatewayMessage,
        heartbeat: &HeartbeatManager,
        connection: &mut WebSocketConnection,
    ) -> GatewayResult<()> {
        if let Some(seq) = message.s {
            heartbeat.update_sequence(seq);
        }

        match GatewayOpcode::from_u8(message.op) {
            Some(GatewayOpcode::Dispatch) => {
                if let Some(event_type) = message.t.as_deref()
                    && let Some(event) = parse_dispatch(event_type, message.d)
                {
                    debug!(event = event.name(), "Dispatching event");
                    let _ = self.event_tx.send(event);
                }
            }
            Some(GatewayOpcode::HeartbeatAck) => heartbeat.record_ack(),
            Some(GatewayOpcode::Heartbeat) => {
                debug!("Gateway requested immediate heartbeat");
                connection
                    .send(&GatewayPayload::heartbeat(heartbeat.last_sequence()))
                    .await?;
            }
            Some(GatewayOpcode::Reconnect) => {
                info!("Gateway requested reconnect");
                return Err(GatewayError::ConnectionClosed {
                    code: 4000,
                    reason: "Reconnect requested".to_string(),
                });
            }
            Some(GatewayOpcode::InvalidSession) => {
                warn!("Session invalidated");
                return Err(GatewayError::SessionInvalidated);
            }
            other => {
                debug!(opcode = ?other, "Unhandled opcode");
            }
        }

        Ok(())
    }
}

async fn await_hello(connection: &mut WebSocketConnection) -> GatewayResult<HelloPayload> {
    let message = timeout(HELLO_TIMEOUT, connection.receive())
        .await
        .map_err(|_| GatewayError::timeout("Hello"))??;

    if GatewayOpcode::from_u8(message.op) != Some(GatewayOpcode::Hello) {
        return Err(GatewayError::UnexpectedOpcode {
            opcode: GatewayOpcode::from_u8(message.op),
        });
    }

    let data = message
        .d
        .ok_or_else(|| GatewayError::protocol("Hello missing data"))?;

    let hello: HelloPayload = serde_json::from_value(data)
        .map_err(|e| GatewayError::serialization(e.to_string()))?;

    debug!(interval_ms = hello.heartbeat_interval, "Received Hello from gateway");
    Ok(hello)
}

fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(6);
    (RECONNECT_DELAY_BASE * 2u32.saturating_pow(exp)).min(RECONNECT_DELAY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert!(backoff_delay(20) <= RECONNECT_DELAY_MAX);
    }
}
