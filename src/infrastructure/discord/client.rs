//! Discord REST API client.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url, header};
use tracing::{debug, warn};

use super::dto::{
    AttachmentDescriptor, AttachmentPayload, CreateDmRequest, CreateMessageRequest,
    DmChannelResponse, ErrorResponse, MessageResponse,
};
use crate::domain::entities::{ChannelId, MessageId, ResizeOutcome, UserId};
use crate::domain::errors::ChatError;
use crate::domain::ports::ChatPort;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Discord REST client authenticated with a bot token.
pub struct DiscordRestClient {
    client: Client,
    base_url: String,
    authorization: String,
    dm_channels: Mutex<HashMap<UserId, ChannelId>>,
}

impl DiscordRestClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(token: &str) -> Result<Self, ChatError> {
        Self::with_base_url(token, DISCORD_API_BASE)
    }

    /// Creates a client with a custom base URL (used by tests).
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Result<Self, ChatError> {
        let client = Client::builder()
            .user_agent(format!(
                "DiscordBot (https://github.com/linuxmobile/pixicord, {})",
                crate::VERSION
            ))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ChatError::client_build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            authorization: format!("Bot {token}"),
            dm_channels: Mutex::new(HashMap::new()),
        })
    }

    /// Builds a URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ChatError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ChatError::malformed(format!("bad API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ChatError::malformed("API base URL cannot carry paths"))?
            .extend(segments);
        Ok(url)
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ChatError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };
        ChatError::api(status.as_u16(), message)
    }

    fn map_send_error(e: &reqwest::Error) -> ChatError {
        if e.is_timeout() {
            ChatError::network("request timed out")
        } else if e.is_connect() {
            ChatError::network("failed to connect to Discord")
        } else {
            ChatError::network(e.to_string())
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error_response(status, response).await)
        }
    }

    /// Opens (or reuses) the DM channel with a user.
    async fn dm_channel(&self, user_id: UserId) -> Result<ChannelId, ChatError> {
        if let Some(channel_id) = self.dm_channels.lock().get(&user_id) {
            return Ok(*channel_id);
        }

        let url = self.endpoint(&["users", "@me", "channels"])?;
        let body = CreateDmRequest {
            recipient_id: user_id.to_string(),
        };

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, &self.authorization)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        let channel: DmChannelResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError::malformed(e.to_string()))?;

        let channel_id = ChannelId::parse(&channel.id)
            .ok_or_else(|| ChatError::malformed("DM channel ID is not a snowflake"))?;

        debug!(user_id = %user_id, channel_id = %channel_id, "Opened DM channel");
        self.dm_channels.lock().insert(user_id, channel_id);
        Ok(channel_id)
    }

    async fn post_to_channel(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<MessageId, ChatError> {
        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, &self.authorization)
            .json(&CreateMessageRequest { content })
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        let message: MessageResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError::malformed(e.to_string()))?;

        MessageId::parse(&message.id)
            .ok_or_else(|| ChatError::malformed("message ID is not a snowflake"))
    }

    async fn post_file_to_channel(
        &self,
        channel_id: ChannelId,
        content: &str,
        outcome: &ResizeOutcome,
    ) -> Result<(), ChatError> {
        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;

        let payload = AttachmentPayload {
            content,
            attachments: vec![AttachmentDescriptor {
                id: 0,
                filename: &outcome.filename,
            }],
        };
        let payload_json =
            serde_json::to_string(&payload).map_err(|e| ChatError::malformed(e.to_string()))?;

        let part = Part::bytes(outcome.bytes.clone())
            .file_name(outcome.filename.clone())
            .mime_str(outcome.format.mime())
            .map_err(|e| ChatError::malformed(e.to_string()))?;

        let form = Form::new()
            .text("payload_json", payload_json)
            .part("files[0]", part);

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, &self.authorization)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatPort for DiscordRestClient {
    async fn post_message(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<MessageId, ChatError> {
        self.post_to_channel(channel_id, content).await
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ChatError> {
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
        ])?;

        let response = self
            .client
            .delete(url)
            .header(header::AUTHORIZATION, &self.authorization)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), ChatError> {
        // The emoji lands in the URL path; `endpoint` percent-encodes it.
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
            "reactions",
            emoji,
            "@me",
        ])?;

        let response = self
            .client
            .put(url)
            .header(header::AUTHORIZATION, &self.authorization)
            .header(header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn send_direct(&self, user_id: UserId, content: &str) -> Result<(), ChatError> {
        let channel_id = self.dm_channel(user_id).await?;
        self.post_to_channel(channel_id, content).await?;
        Ok(())
    }

    async fn send_direct_file(
        &self,
        user_id: UserId,
        content: &str,
        outcome: &ResizeOutcome,
    ) -> Result<(), ChatError> {
        let channel_id = match self.dm_channel(user_id).await {
            Ok(id) => id,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Could not open DM channel");
                return Err(e);
            }
        };
        self.post_file_to_channel(channel_id, content, outcome).await
    }
}
