use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TOKEN_HEADER;
use crate::handlers::{self, protected::tutor, public};
use crate::middleware::auth_gate;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.server.max_request_size_bytes;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Public
        .route("/health", get(public::health))
        .route("/api/health", get(public::health))
        // Protected
        .nest("/api/tutor", tutor_routes(state.clone()))
        .fallback(handlers::not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn tutor_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chat", post(tutor::chat))
        .route("/generate-quiz", post(tutor::generate_quiz))
        .route("/progress", post(tutor::update_progress))
        .route("/api-key", post(tutor::update_api_key))
        .route_layer(middleware::from_fn_with_state(state, auth_gate))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ])
}
