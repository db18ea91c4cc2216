//! Domain entity definitions.

mod asset;
mod ids;
mod resolution;
mod session;

pub use asset::{ImageAsset, ImageKind, ResizeOutcome};
pub use ids::{ChannelId, MessageId, UserId};
pub use resolution::{GESTURE_LARGE, GESTURE_MEDIUM, GESTURE_SMALL, TargetResolution};
pub use session::ResizeSession;
