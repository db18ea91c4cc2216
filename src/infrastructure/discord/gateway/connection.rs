use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use super::constants::{CONNECTION_TIMEOUT, GATEWAY_URL};
use super::error::{GatewayError, GatewayResult};
use super::payloads::{GatewayMessage, GatewayPayload};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

/// A single websocket connection to the gateway.
///
/// Payloads travel as JSON text frames; the bot identifies without
/// transport compression.
pub struct WebSocketConnection {
    writer: Option<WsWriter>,
    reader: Option<WsReader>,
    connected: bool,
}

impl WebSocketConnection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            writer: None,
            reader: None,
            connected: false,
        }
    }

    pub async fn connect(&mut self) -> GatewayResult<()> {
        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(GATEWAY_URL))
            .await
            .map_err(|_| GatewayError::timeout("connection"))?
            .map_err(|e| GatewayError::connection_failed(e.to_string()))?;

        let (writer, reader) = ws_stream.split();
        self.writer = Some(writer);
        self.reader = Some(reader);
        self.connected = true;

        debug!("Gateway websocket established");
        Ok(())
    }

    pub async fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.close().await;
        }
        self.reader = None;
        self.connected = false;
        debug!("Gateway websocket closed");
    }

    pub async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()> {
        let writer = self.writer.as_mut().ok_or(GatewayError::NotConnected)?;

        let json = serde_json::to_string(payload)
            .map_err(|e| GatewayError::serialization(e.to_string()))?;

        writer
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| GatewayError::websocket(e.to_string()))?;

        Ok(())
    }

    pub async fn receive(&mut self) -> GatewayResult<GatewayMessage> {
        let reader = self.reader.as_mut().ok_or(GatewayError::NotConnected)?;

        loop {
            match reader.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    let message: GatewayMessage = serde_json::from_str(&text)
                        .map_err(|e| GatewayError::serialization(e.to_string()))?;
                    return Ok(message);
                }
                Some(Ok(WsMessage::Binary(_))) => {
                    warn!("Unexpected binary frame from uncompressed gateway");
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    self.connected = false;
                    let (code, reason) = frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.to_string()),
                    );
                    return Err(GatewayError::ConnectionClosed { code, reason });
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    if let Some(writer) = self.writer.as_mut() {
                        let _ = writer.send(WsMessage::Pong(data)).await;
                    }
                }
                Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => {
                    self.connected = false;
                    return Err(GatewayError::websocket(e.to_string()));
                }
                None => {
                    self.connected = false;
                    return Err(GatewayError::ConnectionClosed {
                        code: 1000,
                        reason: "Stream ended".to_string(),
                    });
                }
            }
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Default for WebSocketConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_not_connected() {
        let conn = WebSocketConnection::new();
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_is_noop() {
        let mut conn = WebSocketConnection::new();
        conn.disconnect().await;
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn test_send_while_disconnected_fails() {
        let mut conn = WebSocketConnection::new();
        let result = conn.send(&GatewayPayload::heartbeat(None)).await;
        assert!(matches!(result, Err(GatewayError::NotConnected)));
    }
}
