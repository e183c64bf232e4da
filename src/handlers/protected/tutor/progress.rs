use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Deserialize;

use super::parse_body;
use crate::database::models::Progress;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::tutor::progress::record_progress;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub lesson_id: String,
    pub score: f64,
}

/// POST /api/tutor/progress - upsert one lesson score, respond with the full mapping
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<Progress>, ApiError> {
    let request = parse_body(body)?;

    let lesson_id = request.lesson_id.trim();
    if lesson_id.is_empty() {
        return Err(ApiError::bad_request("lessonId is required"));
    }

    let progress = record_progress(state.store.as_ref(), &user.id, lesson_id, request.score).await?;
    Ok(Json(progress))
}
