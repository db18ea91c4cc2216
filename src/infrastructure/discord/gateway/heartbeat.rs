use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{debug, warn};

use super::constants::HEARTBEAT_JITTER_PERCENT;
use super::payloads::GatewayPayload;

/// Drives the periodic heartbeat the gateway demands.
///
/// The run loop feeds it the latest dispatch sequence number and records
/// ACKs; a missing ACK is logged but the connection teardown is left to the
/// gateway's own close.
pub struct HeartbeatManager {
    interval_ms: u64,
    sequence: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    ack_received: Arc<AtomicBool>,
}

impl HeartbeatManager {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            sequence: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            ack_received: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn update_sequence(&self, sequence: u64) {
        self.sequence.store(sequence, Ordering::SeqCst);
    }

    pub fn record_ack(&self) {
        self.ack_received.store(true, Ordering::SeqCst);
    }

    /// Latest dispatch sequence, `None` before the first dispatch.
    pub fn last_sequence(&self) -> Option<u64> {
        match self.sequence.load(Ordering::SeqCst) {
            0 => None,
            seq => Some(seq),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn start(&self, payload_tx: mpsc::Sender<GatewayPayload>) -> tokio::task::JoinHandle<()> {
        let interval_ms = self.interval_ms;
        let sequence = self.sequence.clone();
        let running = self.running.clone();
        let ack_received = self.ack_received.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let jitter = (interval_ms as f64 * HEARTBEAT_JITTER_PERCENT) as u64;
            let first_delay = Duration::from_millis(interval_ms.saturating_sub(jitter));
            let mut ticker = interval_at(
                Instant::now() + first_delay,
                Duration::from_millis(interval_ms),
            );

            while running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                if !ack_received.load(Ordering::SeqCst) {
                    warn!("Heartbeat ACK not received, connection may be dead");
                }

                let seq = sequence.load(Ordering::SeqCst);
                let seq_opt = if seq == 0 { None } else { Some(seq) };

                ack_received.store(false, Ordering::SeqCst);
                if payload_tx.send(GatewayPayload::heartbeat(seq_opt)).await.is_err() {
                    debug!("Heartbeat channel closed");
                    break;
                }
                debug!(sequence = ?seq_opt, "Sent heartbeat");
            }

            debug!("Heartbeat loop stopped");
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for HeartbeatManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_manager_creation() {
        let manager = HeartbeatManager::new(45_000);
        assert_eq!(manager.interval_ms, 45_000);
        assert!(!manager.running.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_carries_latest_sequence() {
        let manager = HeartbeatManager::new(1_000);
        let (tx, mut rx) = mpsc::channel(4);
        let handle = manager.start(tx);

        manager.update_sequence(7);
        let payload = rx.recv().await.expect("heartbeat sent");
        assert_eq!(payload.op, 1);
        assert_eq!(payload.d, 7);

        manager.stop();
        drop(rx);
        let _ = handle.await;
    }
}
