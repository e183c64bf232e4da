//! Credential verification: bearer tokens signed with the shared secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the bearer token on every protected route.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Identity claim carried inside a token: `{ "user": { "id": ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimUser,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimUser {
    pub id: String,
}

impl Claims {
    /// Claims for `user_id` expiring `expiry_hours` from now.
    pub fn new(user_id: impl Into<String>, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?
            .timestamp();

        Ok(Self {
            user: ClaimUser { id: user_id.into() },
            exp,
            iat: now.timestamp(),
        })
    }
}

/// Why a request could not be authenticated.
///
/// Both variants map to 401 for the client; they stay distinct so the
/// server-side log says which one happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no token presented")]
    NoToken,
    #[error("invalid token")]
    InvalidToken,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Token lifetime out of range: {0} hours")]
    InvalidExpiry(u64),
}

/// Sign a token for `claims`. Used by operators and tests; login is handled elsewhere.
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify `token` against `secret` and return its identity claim.
///
/// Library errors are logged here and never returned to the caller.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if token.trim().is_empty() {
        return Err(TokenError::NoToken);
    }

    if secret.is_empty() {
        tracing::error!("Token verification attempted without a configured signing secret");
        return Err(TokenError::InvalidToken);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            TokenError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn round_trips_identity_claim() {
        let token = issue_token(&Claims::new("user-1", 1).unwrap(), SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user.id, "user-1");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue_token(&Claims::new("user-1", 1).unwrap(), SECRET).unwrap();
        assert_eq!(verify_token(&token, "other-secret").unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::new("user-1", 1).unwrap();
        claims.exp = Utc::now().timestamp() - 3600;
        let token = issue_token(&claims, SECRET).unwrap();
        assert_eq!(verify_token(&token, SECRET).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn rejects_garbage_and_blank_tokens() {
        assert_eq!(verify_token("not.a.jwt", SECRET).unwrap_err(), TokenError::InvalidToken);
        assert_eq!(verify_token("   ", SECRET).unwrap_err(), TokenError::NoToken);
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        assert!(matches!(Claims::new("user-1", u64::MAX), Err(JwtError::InvalidExpiry(u64::MAX))));
        assert!(matches!(
            Claims::new("user-1", i64::MAX as u64),
            Err(JwtError::InvalidExpiry(_))
        ));
        assert!(Claims::new("user-1", 24 * 365).is_ok());
    }

    #[test]
    fn empty_secret_is_invalid_token() {
        let token = issue_token(&Claims::new("user-1", 1).unwrap(), SECRET).unwrap();
        assert_eq!(verify_token(&token, "").unwrap_err(), TokenError::InvalidToken);
        assert!(matches!(issue_token(&Claims::new("user-1", 1).unwrap(), ""), Err(JwtError::InvalidSecret)));
    }
}
