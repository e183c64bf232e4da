use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_token, TokenError, TOKEN_HEADER};
use crate::database::{ConnectionState, UserStore};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from the token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyHealth {
    Available,
    Unavailable,
}

/// Reads the store's cached connection state; never performs I/O.
pub fn check_dependency(store: &dyn UserStore) -> DependencyHealth {
    match store.connection_state() {
        ConnectionState::Connected => DependencyHealth::Available,
        _ => DependencyHealth::Unavailable,
    }
}

/// Terminal result of the gate for one request.
#[derive(Debug)]
pub enum Admission {
    Admitted(AuthUser),
    Unauthenticated(TokenError),
    ServiceUnavailable,
}

/// Dependency check, then token extraction, then verification.
pub fn admit(headers: &HeaderMap, store: &dyn UserStore, secret: &str) -> Admission {
    if check_dependency(store) == DependencyHealth::Unavailable {
        return Admission::ServiceUnavailable;
    }

    let token = match extract_token(headers) {
        Ok(token) => token,
        Err(e) => return Admission::Unauthenticated(e),
    };

    match verify_token(token, secret) {
        Ok(claims) => Admission::Admitted(AuthUser { id: claims.user.id }),
        Err(e) => Admission::Unauthenticated(e),
    }
}

/// Pull the token from the `x-auth-token` header
fn extract_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers.get(TOKEN_HEADER).ok_or(TokenError::NoToken)?;

    let token = value.to_str().map_err(|_| TokenError::InvalidToken)?.trim();
    if token.is_empty() {
        return Err(TokenError::NoToken);
    }
    Ok(token)
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NoToken => ApiError::unauthorized("No token, authorization denied"),
            TokenError::InvalidToken => ApiError::unauthorized("Token is not valid"),
        }
    }
}

/// Gate for protected routes: 503 when the store is down, 401 without a valid token.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match admit(request.headers(), state.store.as_ref(), &state.config.security.jwt_secret) {
        Admission::Admitted(user) => {
            tracing::debug!("Admitted user {} to {}", user.id, request.uri().path());
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Admission::ServiceUnavailable => {
            tracing::warn!("Rejecting {}: database connection is not established", request.uri().path());
            Err(ApiError::service_unavailable("Database service unavailable"))
        }
        Admission::Unauthenticated(TokenError::NoToken) => {
            tracing::warn!("Rejecting {}: no token presented", request.uri().path());
            Err(TokenError::NoToken.into())
        }
        Admission::Unauthenticated(TokenError::InvalidToken) => {
            tracing::warn!("Rejecting {}: token failed verification", request.uri().path());
            Err(TokenError::InvalidToken.into())
        }
    }
}
