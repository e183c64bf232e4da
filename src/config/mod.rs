use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_request_size_bytes: usize,
    /// Attach internal error text to 500 bodies. Off unless `EXPOSE_ERROR_DETAIL` is set.
    pub expose_error_detail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string; `None` runs the server without persistence.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub probe_interval_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

// Keep the signing secret out of Debug output
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &if self.jwt_secret.is_empty() { "<unset>" } else { "<redacted>" })
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Credential for the completion service. Absent means chat runs degraded.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("TUTOR_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("TUTOR_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("FRONTEND_URLS") {
            self.server.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }
        if let Some(v) = non_empty_var("EXPOSE_ERROR_DETAIL") {
            self.server.expose_error_detail = parse_flag(&v);
        }

        // Database overrides
        self.database.url = non_empty_var("DATABASE_URL");
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_PROBE_INTERVAL_SECS") {
            self.database.probe_interval_secs = v.parse().unwrap_or(self.database.probe_interval_secs);
        }

        // Security overrides
        if let Some(secret) = non_empty_var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Completion overrides
        self.completion.api_key = non_empty_var("OPENAI_API_KEY");
        if let Some(v) = non_empty_var("OPENAI_BASE_URL") {
            self.completion.base_url = v;
        }
        if let Some(v) = non_empty_var("OPENAI_MODEL") {
            self.completion.model = v;
        }
        if let Ok(v) = env::var("COMPLETION_TEMPERATURE") {
            self.completion.temperature = v.parse().unwrap_or(self.completion.temperature);
        }
        if let Ok(v) = env::var("COMPLETION_MAX_TOKENS") {
            self.completion.max_tokens = v.parse().unwrap_or(self.completion.max_tokens);
        }
        if let Ok(v) = env::var("COMPLETION_TIMEOUT_SECS") {
            self.completion.timeout_secs = v.parse().unwrap_or(self.completion.timeout_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:3002".to_string()],
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                expose_error_detail: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 5,
                probe_interval_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            completion: CompletionConfig::defaults(),
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 20;
        config.security.jwt_expiry_hours = 24;
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
                cors_origins: vec![],
                max_request_size_bytes: 10 * 1024 * 1024,
                expose_error_detail: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                probe_interval_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            completion: CompletionConfig::defaults(),
        }
    }
}

impl CompletionConfig {
    fn defaults() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
