// handlers/mod.rs - two security tiers
//
// Public (no auth) -> Protected (auth gate: database health + token)
pub mod protected;
pub mod public;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
