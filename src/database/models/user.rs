use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// Lesson identifier -> score. One entry per lesson.
pub type Progress = HashMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub avatar_character: String,
    pub progress: Json<Progress>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Fresh record with empty progress, as created at registration.
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            avatar_character: "default".to_string(),
            progress: Json(Progress::new()),
            api_key: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_never_serialized() {
        let mut user = User::new("ada", "ada@example.com", "$2b$10$hash");
        user.api_key = Some("sk-user".to_string());
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("api_key").is_none());
        assert_eq!(value["progress"], serde_json::json!({}));
    }
}
