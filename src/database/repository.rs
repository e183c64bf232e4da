use async_trait::async_trait;
use thiserror::Error;

use super::models::{Progress, User};
use super::monitor::ConnectionState;

/// Errors from the user store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database unavailable")]
    Unavailable,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence backend holding user records.
///
/// `connection_state` must answer from local state only; the auth gate calls
/// it on every protected request before any I/O happens.
#[async_trait]
pub trait UserStore: Send + Sync {
    fn connection_state(&self) -> ConnectionState;

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Set `lesson_id -> score` in the user's progress and return the whole mapping.
    async fn upsert_progress(&self, user_id: &str, lesson_id: &str, score: f64) -> Result<Progress, StoreError>;

    async fn set_api_key(&self, user_id: &str, api_key: &str) -> Result<(), StoreError>;

    async fn close(&self) {}
}
