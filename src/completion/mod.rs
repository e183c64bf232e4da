//! Completion service seam: the language-model dependency behind `/chat`.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One conversation handed to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion client setup failed: {0}")]
    Setup(String),

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion service returned no choices")]
    EmptyResponse,

    #[error("completion service did not answer within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the generated reply text for `request`.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
