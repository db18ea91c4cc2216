//! Pending resize session tracking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::{ResizeSession, TargetResolution, UserId};

/// How long a session stays matchable after the reaction.
pub const SESSION_TTL: Duration = Duration::from_secs(60);

/// Tracks at most one pending session per user.
///
/// The session table is the only cross-request mutable state in the bot.
/// Sessions are looked up by user ID alone; the upload channel is not
/// validated. A later reaction from the same user replaces any pending
/// session (last-reaction-wins).
pub struct SessionManager {
    sessions: Mutex<HashMap<UserId, ResizeSession>>,
    next_generation: AtomicU64,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Creates a manager with the standard 60-second session window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    /// Creates a manager with a custom session window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            ttl,
        }
    }

    /// Opens a session for `user_id`, replacing any pending one.
    ///
    /// Returns the stored session, whose generation token identifies it to
    /// the timeout that gets armed for it.
    pub fn open(&self, user_id: UserId, resolution: TargetResolution) -> ResizeSession {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let session = ResizeSession::new(user_id, resolution, generation, self.ttl);

        let replaced = self.sessions.lock().insert(user_id, session).is_some();
        debug!(
            user_id = %user_id,
            resolution = %resolution,
            generation,
            replaced,
            "Opened resize session"
        );
        session
    }

    /// Resolves an upload to its pending session, retiring it on match.
    ///
    /// Returns `None` when there is no pending session, the session has
    /// expired (lazily evicted here), or the upload carries no attachment.
    /// A zero-attachment message does not consume the session.
    pub fn match_upload(&self, user_id: UserId, has_attachment: bool) -> Option<ResizeSession> {
        if !has_attachment {
            return None;
        }

        let mut sessions = self.sessions.lock();
        match sessions.get(&user_id) {
            Some(session) if session.is_expired() => {
                sessions.remove(&user_id);
                debug!(user_id = %user_id, "Evicted expired session on upload");
                None
            }
            Some(_) => sessions.remove(&user_id),
            None => None,
        }
    }

    /// Removes the session armed with `generation`, if it is still pending.
    ///
    /// Returns whether a timeout notification is due. A stale generation
    /// means the session was matched or superseded; the timer is a no-op.
    pub fn expire(&self, user_id: UserId, generation: u64) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions.get(&user_id) {
            Some(session) if session.generation == generation => {
                sessions.remove(&user_id);
                debug!(user_id = %user_id, generation, "Session timed out");
                true
            }
            _ => false,
        }
    }

    /// Number of currently pending sessions.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// The session window length, used to arm timeout timers.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: UserId = UserId(7);

    #[test]
    fn test_open_then_match_retires_session() {
        let manager = SessionManager::new();
        manager.open(USER, TargetResolution::Medium);

        let matched = manager.match_upload(USER, true).expect("should match");
        assert_eq!(matched.resolution, TargetResolution::Medium);
        assert_eq!(manager.pending_count(), 0);

        // Already retired, a second upload finds nothing.
        assert!(manager.match_upload(USER, true).is_none());
    }

    #[test]
    fn test_second_reaction_wins() {
        let manager = SessionManager::new();
        let first = manager.open(USER, TargetResolution::Small);
        let second = manager.open(USER, TargetResolution::Large);
        assert!(second.generation > first.generation);

        let matched = manager.match_upload(USER, true).expect("should match");
        assert_eq!(matched.resolution, TargetResolution::Large);
    }

    #[test]
    fn test_upload_without_attachment_does_not_consume() {
        let manager = SessionManager::new();
        manager.open(USER, TargetResolution::Small);

        assert!(manager.match_upload(USER, false).is_none());
        assert_eq!(manager.pending_count(), 1);
        assert!(manager.match_upload(USER, true).is_some());
    }

    #[test]
    fn test_expired_session_is_lazily_evicted() {
        let manager = SessionManager::with_ttl(Duration::ZERO);
        manager.open(USER, TargetResolution::Small);

        assert!(manager.match_upload(USER, true).is_none());
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn test_expire_matches_generation() {
        let manager = SessionManager::new();
        let first = manager.open(USER, TargetResolution::Small);
        let second = manager.open(USER, TargetResolution::Medium);

        // The superseded session's timer must be a no-op.
        assert!(!manager.expire(USER, first.generation));
        assert_eq!(manager.pending_count(), 1);

        assert!(manager.expire(USER, second.generation));
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn test_expire_after_match_is_noop() {
        let manager = SessionManager::new();
        let session = manager.open(USER, TargetResolution::Small);
        manager.match_upload(USER, true).expect("should match");

        assert!(!manager.expire(USER, session.generation));
    }

    #[test]
    fn test_unknown_user_never_matches() {
        let manager = SessionManager::new();
        assert!(manager.match_upload(UserId(999), true).is_none());
    }
}
