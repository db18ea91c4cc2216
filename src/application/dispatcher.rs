//! Interaction dispatcher: the per-user resize state machine.
//!
//! Drives the flow NoSession -> Pending -> (Matched | Expired) in response
//! to typed chat events. All failures are converted to user-visible direct
//! messages here; nothing propagates out of the dispatcher.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::session_manager::SessionManager;
use crate::application::transcoder;
use crate::domain::entities::{MessageId, ResizeOutcome, TargetResolution, UserId};
use crate::domain::errors::{FetchError, TranscodeError};
use crate::domain::ports::{AttachmentRef, ChatEvent, ChatPort, FetchPort};

const MSG_PROCESSING: &str = "Processing your image...";
const MSG_SUCCESS: &str = "Here is your resized image:";
const MSG_DOWNLOAD_FAILED: &str = "Error downloading the file.";
const MSG_PROCESSING_FAILED: &str = "There was an error processing the image.";
const MSG_TIMED_OUT: &str = "Time's up! React on the control message again when you're ready.";

#[derive(Debug, Error)]
enum ProcessError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// Orchestrates sessions, fetching, and transcoding for incoming events.
pub struct InteractionDispatcher {
    sessions: Arc<SessionManager>,
    chat: Arc<dyn ChatPort>,
    fetcher: Arc<dyn FetchPort>,
    control_message: MessageId,
    self_user: Mutex<Option<UserId>>,
}

impl InteractionDispatcher {
    /// Creates a dispatcher bound to the given control message.
    #[must_use]
    pub fn new(
        sessions: Arc<SessionManager>,
        chat: Arc<dyn ChatPort>,
        fetcher: Arc<dyn FetchPort>,
        control_message: MessageId,
    ) -> Self {
        Self {
            sessions,
            chat,
            fetcher,
            control_message,
            self_user: Mutex::new(None),
        }
    }

    /// Records the bot's own identity so its seed reactions and outbound
    /// messages never open or match sessions.
    pub fn set_self_user(&self, user_id: UserId) {
        *self.self_user.lock() = Some(user_id);
    }

    fn is_self(&self, user_id: UserId) -> bool {
        *self.self_user.lock() == Some(user_id)
    }

    /// Dispatches one inbound event through the state machine.
    ///
    /// Session-state transitions run synchronously in the caller's task, so
    /// a user's events always apply in arrival order. Only the I/O
    /// continuation (prompt, fetch, transcode, delivery) lands on a spawned
    /// task, returned here so callers can await its completion.
    pub fn handle_event(self: &Arc<Self>, event: ChatEvent) -> Option<JoinHandle<()>> {
        match event {
            ChatEvent::Ready { user_id } => {
                self.set_self_user(user_id);
                None
            }
            ChatEvent::ReactionAdded {
                message_id,
                user_id,
                emoji,
                ..
            } => self.handle_reaction(message_id, user_id, &emoji),
            ChatEvent::MessageCreated {
                author_id,
                author_is_bot,
                attachments,
                ..
            } => self.handle_upload(author_id, author_is_bot, &attachments),
            ChatEvent::Disconnected { reason } => {
                warn!(reason = %reason, "Gateway disconnected");
                None
            }
            ChatEvent::Reconnecting { attempt } => {
                debug!(attempt, "Gateway reconnecting");
                None
            }
        }
    }

    /// Opens a session when a recognized gesture lands on the control message.
    ///
    /// The session is pending by the time this returns; the upload prompt is
    /// delivered on the returned task.
    pub fn handle_reaction(
        self: &Arc<Self>,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> Option<JoinHandle<()>> {
        if message_id != self.control_message || self.is_self(user_id) {
            return None;
        }

        let Some(resolution) = TargetResolution::from_gesture(emoji) else {
            debug!(user_id = %user_id, emoji, "Ignoring unrecognized gesture");
            return None;
        };

        let session = self.sessions.open(user_id, resolution);
        self.arm_timeout(user_id, session.generation);

        info!(user_id = %user_id, resolution = %resolution, "Awaiting upload");

        let prompt = format!(
            "Resolution {resolution} selected. Send me your image within the next \
             {} seconds and I'll resize it.",
            self.sessions.ttl().as_secs()
        );
        let dispatcher = Arc::clone(self);
        Some(tokio::spawn(async move {
            if let Err(e) = dispatcher.chat.send_direct(user_id, &prompt).await {
                warn!(user_id = %user_id, error = %e, "Failed to send upload prompt");
            }
        }))
    }

    /// Schedules the cooperative timeout for a freshly opened session.
    ///
    /// The generation token makes the timer a no-op once the session is
    /// matched or superseded by a later reaction.
    fn arm_timeout(self: &Arc<Self>, user_id: UserId, generation: u64) {
        let dispatcher = Arc::clone(self);
        let ttl = self.sessions.ttl();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            dispatcher.handle_timeout(user_id, generation).await;
        });
    }

    /// Matches an upload against its pending session and runs the pipeline.
    ///
    /// An upload with no pending session is silently ignored: it is not part
    /// of any active flow. Matching retires the session synchronously,
    /// before this returns; only the fetch/transcode/delivery continuation
    /// runs on the returned task, and a failure there never resurrects the
    /// session.
    pub fn handle_upload(
        self: &Arc<Self>,
        author_id: UserId,
        author_is_bot: bool,
        attachments: &[AttachmentRef],
    ) -> Option<JoinHandle<()>> {
        if author_is_bot || self.is_self(author_id) {
            return None;
        }

        let session = self
            .sessions
            .match_upload(author_id, !attachments.is_empty())?;

        // First attachment wins; match_upload guaranteed there is one.
        let attachment = attachments[0].clone();
        info!(
            user_id = %author_id,
            filename = %attachment.filename,
            resolution = %session.resolution,
            "Upload matched, processing"
        );

        let dispatcher = Arc::clone(self);
        Some(tokio::spawn(async move {
            dispatcher
                .run_pipeline(author_id, &attachment, session.resolution)
                .await;
        }))
    }

    /// Fetches, transcodes, and delivers one matched upload.
    async fn run_pipeline(
        &self,
        author_id: UserId,
        attachment: &AttachmentRef,
        resolution: TargetResolution,
    ) {
        if let Err(e) = self.chat.send_direct(author_id, MSG_PROCESSING).await {
            warn!(user_id = %author_id, error = %e, "Failed to send processing ack");
        }

        match self.process(&attachment.url, resolution).await {
            Ok(outcome) => {
                info!(
                    user_id = %author_id,
                    filename = %outcome.filename,
                    bytes = outcome.bytes.len(),
                    "Delivering resized asset"
                );
                if let Err(e) = self
                    .chat
                    .send_direct_file(author_id, MSG_SUCCESS, &outcome)
                    .await
                {
                    warn!(user_id = %author_id, error = %e, "Failed to deliver result");
                }
            }
            Err(e) => {
                let notice = match &e {
                    ProcessError::Fetch(_) => MSG_DOWNLOAD_FAILED,
                    ProcessError::Transcode(_) => MSG_PROCESSING_FAILED,
                };
                warn!(user_id = %author_id, error = %e, "Resize request failed");
                if let Err(e) = self.chat.send_direct(author_id, notice).await {
                    warn!(user_id = %author_id, error = %e, "Failed to send failure notice");
                }
            }
        }
    }

    /// Expires an unmatched session and tells the user.
    pub async fn handle_timeout(&self, user_id: UserId, generation: u64) {
        if !self.sessions.expire(user_id, generation) {
            return;
        }

        debug!(user_id = %user_id, "Session expired without upload");
        if let Err(e) = self.chat.send_direct(user_id, MSG_TIMED_OUT).await {
            warn!(user_id = %user_id, error = %e, "Failed to send timeout notice");
        }
    }

    /// Fetches and transcodes a single attachment.
    ///
    /// The decode/resize work runs on a blocking worker so a large animation
    /// never stalls other users' events.
    async fn process(
        &self,
        url: &str,
        resolution: TargetResolution,
    ) -> Result<ResizeOutcome, ProcessError> {
        let bytes = self.fetcher.fetch(url).await?;

        let outcome = tokio::task::spawn_blocking(move || transcoder::transcode(&bytes, resolution))
            .await
            .map_err(|e| TranscodeError::decode(format!("transcode worker panicked: {e}")))??;

        Ok(outcome)
    }
}
