use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use tutor_api::completion::{CompletionClient, OpenAiClient};
use tutor_api::config::{self, AppConfig};
use tutor_api::database::{postgres::validate_database_url, MemoryUserStore, PgUserStore, UserStore};
use tutor_api::is_production;
use tutor_api::tutor::QuizCatalog;
use tutor_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "tutor-api", version, about = "Kids' programming tutor API server")]
struct Args {
    /// Address to bind (overrides TUTOR_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides TUTOR_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting tutor API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("Missing required environment variable: JWT_SECRET");
    }
    if config.server.expose_error_detail {
        tracing::warn!("EXPOSE_ERROR_DETAIL is on; 500 responses will include internal error text");
    }

    let (store, probe) = connect_store(config).await?;
    let completion = init_completion(config);

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::clone(&store),
        completion,
        quizzes: Arc::new(QuizCatalog::builtin()),
    };

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Tutor API listening on http://{}", bind_addr);
    tracing::info!("API available at http://{}/api", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(probe) = probe {
        probe.abort();
    }
    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Pick the persistence backend. Outside production a missing or unreachable
/// database is tolerated: protected routes answer 503 until it comes up.
async fn connect_store(config: &AppConfig) -> Result<(Arc<dyn UserStore>, Option<JoinHandle<()>>)> {
    let db = &config.database;

    let Some(url) = db.url.as_deref() else {
        if is_production!() {
            bail!("DATABASE_URL is required in production");
        }
        tracing::warn!("Skipping database connection - no DATABASE_URL provided");
        tracing::warn!("Server running without database connection");
        let offline: Arc<dyn UserStore> = Arc::new(MemoryUserStore::offline());
        return Ok((offline, None));
    };

    if validate_database_url(url).is_err() {
        if is_production!() {
            bail!("Invalid DATABASE_URL format");
        }
        tracing::error!("Invalid DATABASE_URL format, running without database connection");
        let offline: Arc<dyn UserStore> = Arc::new(MemoryUserStore::offline());
        return Ok((offline, None));
    }

    let probe_interval = Duration::from_secs(db.probe_interval_secs.max(1));
    let probe_timeout = Duration::from_secs(db.connection_timeout.max(1));

    let store = match PgUserStore::connect(url, db).await {
        Ok(store) => store,
        Err(e) if is_production!() => {
            return Err(e).context("Failed to connect to database in production environment");
        }
        Err(e) => {
            tracing::warn!("Database connection failed ({}); retrying in the background", e);
            PgUserStore::connect_lazy(url, db).context("failed to build database pool")?
        }
    };

    let probe = store.spawn_probe(probe_interval, probe_timeout);
    let store: Arc<dyn UserStore> = Arc::new(store);
    Ok((store, Some(probe)))
}

fn init_completion(config: &AppConfig) -> Option<Arc<dyn CompletionClient>> {
    match OpenAiClient::from_config(&config.completion) {
        Some(Ok(client)) => {
            tracing::info!("Completion service enabled (model: {})", config.completion.model);
            let client: Arc<dyn CompletionClient> = Arc::new(client);
            Some(client)
        }
        Some(Err(e)) => {
            tracing::warn!("Completion client initialization failed: {}", e);
            None
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; chat will answer with suggested actions only");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, shutting down gracefully");
}
