pub mod auth;

pub use auth::{admit, auth_gate, check_dependency, Admission, AuthUser, DependencyHealth};
