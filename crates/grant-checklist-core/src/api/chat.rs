use serde::{Deserialize, Serialize};

use super::{read_body, Backend};
use crate::config::Config;
use crate::error::ApiError;
use crate::state::ChatMessage;

/// Body of a chat call: the newest message plus the whole conversation,
/// newest message included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    backend: Backend,
    path: String,
}

impl ChatClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            backend: Backend::from_config(config)?,
            path: config.chat_path().to_string(),
        })
    }

    pub async fn send(&self, request: &ChatRequest) -> Result<String, ApiError> {
        tracing::info!(turns = request.history.len(), "sending chat message");

        let response = self.backend.post(&self.path).json(request).send().await?;
        let body = read_body(response).await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        parsed.reply.ok_or(ApiError::MissingReply)
    }
}
