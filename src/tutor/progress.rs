use crate::database::models::{Progress, User};
use crate::database::{StoreError, UserStore};

/// Load the record behind an admitted identity. A token may outlive its user.
async fn resolve_user(store: &dyn UserStore, user_id: &str) -> Result<User, StoreError> {
    store.find_user(user_id).await?.ok_or_else(|| {
        tracing::warn!("Authenticated user {} has no stored record", user_id);
        StoreError::UserNotFound(user_id.to_string())
    })
}

/// Set the user's score for `lesson_id` and return their full progress mapping.
pub async fn record_progress(
    store: &dyn UserStore,
    user_id: &str,
    lesson_id: &str,
    score: f64,
) -> Result<Progress, StoreError> {
    let user = resolve_user(store, user_id).await?;
    let progress = store.upsert_progress(&user.id.to_string(), lesson_id, score).await?;
    tracing::debug!("Recorded progress for {}: {} -> {}", user.username, lesson_id, score);
    Ok(progress)
}

/// Replace the user's stored completion-service key.
pub async fn update_api_key(store: &dyn UserStore, user_id: &str, api_key: &str) -> Result<(), StoreError> {
    let user = resolve_user(store, user_id).await?;
    store.set_api_key(&user.id.to_string(), api_key).await?;
    tracing::info!("API key updated for user {}", user_id);
    Ok(())
}
