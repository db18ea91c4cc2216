//! Per-user resize session state.

use std::time::{Duration, Instant};

use super::{TargetResolution, UserId};

/// Ephemeral record of a user's chosen resolution awaiting a matching upload.
///
/// Owned exclusively by the session manager; never persisted across restarts.
/// The `generation` token lets a scheduled timeout distinguish the session it
/// was armed for from a replacement opened by a later reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    /// The user who reacted.
    pub user_id: UserId,
    /// The resolution their gesture selected.
    pub resolution: TargetResolution,
    /// Monotonic token identifying this particular session instance.
    pub generation: u64,
    /// When the session was opened.
    pub created_at: Instant,
    /// When the session stops being matchable.
    pub deadline: Instant,
}

impl ResizeSession {
    /// Creates a session expiring `ttl` from now.
    #[must_use]
    pub fn new(user_id: UserId, resolution: TargetResolution, generation: u64, ttl: Duration) -> Self {
        let created_at = Instant::now();
        Self {
            user_id,
            resolution,
            generation,
            created_at,
            deadline: created_at + ttl,
        }
    }

    /// Returns whether the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
