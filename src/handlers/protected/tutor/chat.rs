use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Serialize;

use super::parse_body;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::tutor::{converse, ChatInput, ChatOutcome};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Model reply; omitted when chat runs without a completion service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub suggested_actions: Vec<String>,
}

/// POST /api/tutor/chat
///
/// Body: `{ "message": "...", "context": [{ "type": "user", "content": "..." }], "lessonId": "variables" }`
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let input = parse_body(body)?;
    tracing::debug!("Chat request from user {} (lesson: {:?})", user.id, input.lesson());

    match converse(state.completion.as_ref(), &state.config.completion, &input).await {
        ChatOutcome::Reply {
            message,
            suggested_actions,
        } => Ok(Json(ChatResponse {
            message: Some(message),
            suggested_actions,
        })),
        ChatOutcome::Degraded { suggested_actions } => Ok(Json(ChatResponse {
            message: None,
            suggested_actions,
        })),
        ChatOutcome::Failed(e) => Err(ApiError::internal_server_error("Error processing chat request")
            .with_detail(e, state.config.server.expose_error_detail)),
    }
}
