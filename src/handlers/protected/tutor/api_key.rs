use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_body;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::tutor::progress;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: String,
}

/// POST /api/tutor/api-key - store the caller's completion-service key
pub async fn update_api_key(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ApiKeyRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body(body)?;

    progress::update_api_key(state.store.as_ref(), &user.id, &request.api_key).await?;
    Ok(Json(json!({ "message": "API key updated successfully" })))
}
