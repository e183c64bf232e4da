//! Tutor features behind the auth gate: chat, quizzes and progress.

pub mod actions;
pub mod chat;
pub mod progress;
pub mod quiz;

pub use actions::generate_suggested_actions;
pub use chat::{converse, ChatInput, ChatOutcome};
pub use quiz::{fallback_question, Difficulty, QuizCatalog, QuizQuestion};
