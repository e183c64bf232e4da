pub mod user;

pub use user::{Progress, User};
