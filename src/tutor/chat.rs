//! Chat orchestration with a degraded mode for when no completion service is configured.
//!
//! Absence of the completion client is a planned condition and still yields a
//! successful payload (suggested actions only). A client that is present but
//! fails mid-call is reported as [`ChatOutcome::Failed`].

use serde::Deserialize;
use std::sync::Arc;

use super::actions::generate_suggested_actions;
use crate::completion::{ChatMessage, CompletionClient, CompletionError, CompletionRequest, Role};
use crate::config::CompletionConfig;

pub const SYSTEM_PROMPT: &str =
    "You are a friendly Python programming tutor for kids. Keep explanations simple and fun.";

/// Prior exchange supplied by the caller: `{ "type": "user" | ..., "content": ... }`.
/// A turn without `type` counts as an assistant turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextTurn {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub content: String,
}

impl ContextTurn {
    /// Anything not sent by the user is treated as an assistant turn.
    fn role(&self) -> Role {
        if self.kind == "user" {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub message: String,
    #[serde(default)]
    pub context: Vec<ContextTurn>,
    #[serde(default)]
    pub lesson_id: Option<String>,
}

impl ChatInput {
    pub fn lesson(&self) -> Option<&str> {
        self.lesson_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Debug)]
pub enum ChatOutcome {
    Reply {
        message: String,
        suggested_actions: Vec<String>,
    },
    Degraded {
        suggested_actions: Vec<String>,
    },
    Failed(CompletionError),
}

/// System instruction, then the caller's history, then the new user message.
pub fn build_request(input: &ChatInput, settings: &CompletionConfig) -> CompletionRequest {
    let mut system = SYSTEM_PROMPT.to_string();
    if let Some(lesson) = input.lesson() {
        system.push_str(&format!(" The current lesson is about {}.", lesson));
    }

    let mut messages = Vec::with_capacity(input.context.len() + 2);
    messages.push(ChatMessage::new(Role::System, system));
    messages.extend(
        input
            .context
            .iter()
            .map(|turn| ChatMessage::new(turn.role(), turn.content.clone())),
    );
    messages.push(ChatMessage::new(Role::User, input.message.clone()));

    CompletionRequest {
        messages,
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}

pub async fn converse(
    client: Option<&Arc<dyn CompletionClient>>,
    settings: &CompletionConfig,
    input: &ChatInput,
) -> ChatOutcome {
    let suggested_actions = generate_suggested_actions(input.lesson());

    let Some(client) = client else {
        tracing::debug!("Completion service not configured, answering in degraded mode");
        return ChatOutcome::Degraded { suggested_actions };
    };

    let request = build_request(input, settings);
    let timeout = settings.timeout();

    let result = match tokio::time::timeout(timeout, client.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(CompletionError::Timeout(timeout)),
    };

    match result {
        Ok(message) => ChatOutcome::Reply {
            message,
            suggested_actions,
        },
        Err(e) => {
            tracing::error!("Chat error: {}", e);
            ChatOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Scripted {
        reply: Result<String, u16>,
        delay: Duration,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request);
            tokio::time::sleep(self.delay).await;
            self.reply.clone().map_err(|status| CompletionError::Status {
                status,
                body: "quota exceeded".to_string(),
            })
        }
    }

    fn input(lesson: Option<&str>) -> ChatInput {
        ChatInput {
            message: "What is a loop?".to_string(),
            context: vec![
                ContextTurn { kind: "user".to_string(), content: "hi".to_string() },
                ContextTurn { kind: "bot".to_string(), content: "hello!".to_string() },
            ],
            lesson_id: lesson.map(String::from),
        }
    }

    #[test]
    fn request_wraps_history_between_system_and_user() {
        let settings = AppConfig::development().completion;
        let request = build_request(&input(Some("control-flow")), &settings);

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert!(request.messages[0].content.ends_with("The current lesson is about control-flow."));
        assert_eq!(request.messages[3].content, "What is a loop?");
        assert_eq!(request.max_tokens, 500);
    }

    #[test]
    fn untyped_context_turn_is_assistant() {
        let input: ChatInput = serde_json::from_value(serde_json::json!({
            "message": "and now?",
            "context": [{ "content": "earlier reply" }, { "type": "user", "content": "thanks" }]
        }))
        .unwrap();

        let roles: Vec<Role> = input.context.iter().map(ContextTurn::role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User]);
    }

    #[test]
    fn blank_lesson_is_ignored() {
        let settings = AppConfig::development().completion;
        let request = build_request(&input(Some("")), &settings);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn unconfigured_client_degrades() {
        let settings = AppConfig::development().completion;
        match converse(None, &settings, &input(Some("variables"))).await {
            ChatOutcome::Degraded { suggested_actions } => {
                assert_eq!(suggested_actions.len(), 5);
                assert!(suggested_actions[0].contains("variables"));
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn configured_client_replies() {
        let settings = AppConfig::development().completion;
        let scripted = Arc::new(Scripted::replying("A loop repeats code."));
        let client: Arc<dyn CompletionClient> = scripted.clone();

        match converse(Some(&client), &settings, &input(None)).await {
            ChatOutcome::Reply { message, suggested_actions } => {
                assert_eq!(message, "A loop repeats code.");
                assert_eq!(suggested_actions.len(), 4);
            }
            other => panic!("expected reply, got {:?}", other),
        }
        assert_eq!(scripted.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn client_error_fails() {
        let settings = AppConfig::development().completion;
        let client: Arc<dyn CompletionClient> = Arc::new(Scripted {
            reply: Err(429),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        });

        let outcome = converse(Some(&client), &settings, &input(None)).await;
        assert!(matches!(outcome, ChatOutcome::Failed(CompletionError::Status { status: 429, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_client_times_out() {
        let mut settings = AppConfig::development().completion;
        settings.timeout_secs = 1;
        let client: Arc<dyn CompletionClient> = Arc::new(Scripted {
            reply: Ok("too late".to_string()),
            delay: Duration::from_secs(5),
            seen: Mutex::new(Vec::new()),
        });

        let outcome = converse(Some(&client), &settings, &input(None)).await;
        assert!(matches!(outcome, ChatOutcome::Failed(CompletionError::Timeout(_))));
    }
}
