use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};
use crate::config::CompletionConfig;

// OpenAI-compatible request/response
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Build a client from config. `None` when no credential is configured.
    pub fn from_config(config: &CompletionConfig) -> Option<Result<Self, CompletionError>> {
        let key = config.api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, config))
    }

    pub fn new(api_key: &str, config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout() + Duration::from_secs(5))
            .build()
            .map_err(|e| CompletionError::Setup(e.to_string()))?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let parsed: ChatResponse = res.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;
    use crate::config::AppConfig;

    #[test]
    fn missing_or_blank_key_disables_client() {
        let mut config = AppConfig::development().completion;
        assert!(OpenAiClient::from_config(&config).is_none());

        config.api_key = Some("   ".to_string());
        assert!(OpenAiClient::from_config(&config).is_none());
    }

    #[test]
    fn builds_client_with_key() {
        let mut config = AppConfig::development().completion;
        config.api_key = Some("sk-test".to_string());
        config.base_url = "https://api.example.com/v1/".to_string();

        let client = OpenAiClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model, "gpt-3.5-turbo");
    }

    #[test]
    fn request_body_uses_wire_role_names() {
        let messages = vec![
            ChatMessage::new(Role::System, "be nice"),
            ChatMessage::new(Role::Assistant, "hi"),
        ];
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 500,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert_eq!(value["max_tokens"], 500);
    }
}
