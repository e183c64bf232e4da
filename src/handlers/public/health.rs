use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health - liveness plus the cached database connection state.
///
/// Always 200: this route reports, it does not gate.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": state.store.connection_state().as_str(),
    }))
}
