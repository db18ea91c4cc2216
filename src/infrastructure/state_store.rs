//! Persistence for the control message id.
//!
//! The control message survives restarts; on boot the stored id lets the bot
//! delete the stale message before posting a fresh one.

use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::entities::MessageId;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotState {
    pub control_message_id: Option<String>,
}

impl BotState {
    /// Returns the stored control message id, if any was persisted.
    #[must_use]
    pub fn control_message(&self) -> Option<MessageId> {
        self.control_message_id
            .as_deref()
            .and_then(MessageId::parse)
    }
}

#[derive(Clone)]
pub struct StateStore {
    state_path: Option<PathBuf>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Creates a state store at the platform default location.
    ///
    /// If project directories cannot be determined, persistence is disabled
    /// and a warning is logged.
    #[must_use]
    pub fn new() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("com", "pixicord", "pixicord") {
            let state_path = proj_dirs.config_dir().join("state.toml");
            Self {
                state_path: Some(state_path),
            }
        } else {
            tracing::warn!("Failed to determine project directories. State persistence disabled.");
            Self { state_path: None }
        }
    }

    /// Creates a state store at an explicit path.
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            state_path: Some(path),
        }
    }

    /// Loads the persisted state from disk.
    ///
    /// A missing or unreadable state file yields the default state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists but cannot be read.
    pub async fn load(&self) -> Result<BotState> {
        let Some(path) = &self.state_path else {
            return Ok(BotState::default());
        };

        if !path.exists() {
            return Ok(BotState::default());
        }

        let content = fs::read_to_string(path)
            .await
            .wrap_err("Failed to read state file")?;

        match toml::from_str(&content) {
            Ok(state) => Ok(state),
            Err(_) => Ok(BotState::default()),
        }
    }

    /// Saves the control message id to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or the
    /// state file cannot be written.
    pub async fn save(&self, control_message: MessageId) -> Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };

        let state = BotState {
            control_message_id: Some(control_message.to_string()),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .wrap_err("Failed to create config directory")?;
        }

        let content = toml::to_string(&state).wrap_err("Failed to serialize state")?;

        fs::write(path, content)
            .await
            .wrap_err("Failed to write state file")?;

        Ok(())
    }
}
