pub mod app;
pub mod auth;
pub mod completion;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod tutor;

pub use app::app;
pub use state::AppState;
