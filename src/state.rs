use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::config::AppConfig;
use crate::database::UserStore;
use crate::tutor::QuizCatalog;

/// Shared handles for every request. Everything here is read-only from a handler's view.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
    /// `None` when the completion service is not configured.
    pub completion: Option<Arc<dyn CompletionClient>>,
    pub quizzes: Arc<QuizCatalog>,
}
