pub mod api_key;
pub mod chat;
pub mod progress;
pub mod quiz;

pub use api_key::update_api_key;
pub use chat::chat;
pub use progress::update_progress;
pub use quiz::generate_quiz;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into the standard error body.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection);
        ApiError::bad_request(rejection.body_text())
    })
}
