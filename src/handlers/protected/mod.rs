// handlers/protected/mod.rs - handlers behind the auth gate
//
// The gate has already checked database health and verified the token; an
// `AuthUser` is available as a request extension.
pub mod tutor;
