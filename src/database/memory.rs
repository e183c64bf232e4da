use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Progress, User};
use super::monitor::{ConnectionMonitor, ConnectionState};
use super::repository::{StoreError, UserStore};

/// In-process user store.
///
/// Backs the server when no database is configured (`offline`, every protected
/// route answers 503) and serves as the store for tests.
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    monitor: ConnectionMonitor,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::with_state(ConnectionState::Connected)
    }

    pub fn offline() -> Self {
        Self::with_state(ConnectionState::Disconnected)
    }

    fn with_state(state: ConnectionState) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            monitor: ConnectionMonitor::new(state),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.monitor.set(if available {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        });
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        match self.monitor.state() {
            ConnectionState::Connected => Ok(()),
            _ => Err(StoreError::Unavailable),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(user_id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(user_id).map_err(|_| StoreError::UserNotFound(user_id.to_string()))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn connection_state(&self) -> ConnectionState {
        self.monitor.state()
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.ensure_available()?;
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert_progress(&self, user_id: &str, lesson_id: &str, score: f64) -> Result<Progress, StoreError> {
        self.ensure_available()?;
        let id = parse_id(user_id)?;

        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        user.progress.0.insert(lesson_id.to_string(), score);
        user.updated_at = Utc::now();
        Ok(user.progress.0.clone())
    }

    async fn set_api_key(&self, user_id: &str, api_key: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        let id = parse_id(user_id)?;

        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        user.api_key = Some(api_key.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }
}
