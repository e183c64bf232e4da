#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use tutor_api::auth::{issue_token, Claims, TOKEN_HEADER};
use tutor_api::completion::{CompletionClient, CompletionError, CompletionRequest};
use tutor_api::config::{AppConfig, Environment};
use tutor_api::database::models::User;
use tutor_api::database::MemoryUserStore;
use tutor_api::tutor::QuizCatalog;
use tutor_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

pub fn test_config(environment: Environment) -> AppConfig {
    let mut config = AppConfig::development();
    config.environment = environment;
    config.security.jwt_secret = SECRET.to_string();
    config
}

pub fn token_for(user_id: &str) -> String {
    let lifetime = AppConfig::development().security.jwt_expiry_hours;
    let claims = Claims::new(user_id, lifetime).expect("lifetime in range");
    issue_token(&claims, SECRET).expect("token should sign")
}

/// Completion client that answers with a fixed reply or a fixed HTTP status error.
pub struct ScriptedCompletion {
    reply: std::result::Result<String, u16>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone().map_err(|status| CompletionError::Status {
            status,
            body: "upstream exploded at line 42".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(test_config(Environment::Development), None)
    }

    pub fn with_completion(client: Arc<dyn CompletionClient>, environment: Environment) -> Self {
        Self::build(test_config(environment), Some(client))
    }

    pub fn build(config: AppConfig, completion: Option<Arc<dyn CompletionClient>>) -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let state = AppState {
            config: Arc::new(config),
            store: store.clone(),
            completion,
            quizzes: Arc::new(QuizCatalog::builtin()),
        };

        Self {
            router: app(state),
            store,
        }
    }

    /// Insert a user and return its id with a valid token.
    pub async fn seed_user(&self, username: &str) -> (String, String) {
        let user = User::new(username, format!("{}@example.com", username), "hashed-password");
        let id = user.id.to_string();
        self.store.insert_user(user).await;
        let token = token_for(&id);
        (id, token)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        self.send(builder.body(Body::from(body.to_string()))?).await
    }

    pub async fn post_raw(&self, path: &str, token: &str, body: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .header(TOKEN_HEADER, token)
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder().method("GET").uri(path).body(Body::empty())?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await.context("router call failed")?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, body))
    }
}
