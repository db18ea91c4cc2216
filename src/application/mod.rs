//! Application layer: the resize session state machine and pipeline.

/// Control message bootstrap.
pub mod control_panel;
/// Event dispatch and per-user state machine.
pub mod dispatcher;
/// Pending session tracking.
pub mod session_manager;
/// Image decode/resize/encode pipeline.
pub mod transcoder;

pub use dispatcher::InteractionDispatcher;
pub use session_manager::{SESSION_TTL, SessionManager};
pub use transcoder::MAX_ANIMATED_FRAMES;
