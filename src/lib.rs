//! Pixicord - a Discord image-resizing bot.
//!
//! Users pick a target resolution by reacting on a persistent control
//! message, then upload an image; the bot downloads it, resizes it to the
//! chosen resolution, and delivers the result back via direct message.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the session manager, transcoder, and dispatcher.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for Discord and local storage.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pixicord";
