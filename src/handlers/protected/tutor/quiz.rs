use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tutor::{fallback_question, Difficulty, QuizQuestion};

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub quiz: QuizQuestion,
}

/// POST /api/tutor/generate-quiz
///
/// Always answers 200 with a valid question; failures serve the fallback question.
pub async fn generate_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Json<QuizResponse> {
    let quiz = match body {
        Ok(Json(request)) => {
            let difficulty = Difficulty::parse(request.difficulty.as_deref());
            state.quizzes.draw(&request.topic, difficulty, &mut rand::thread_rng())
        }
        Err(rejection) => {
            tracing::warn!("Quiz generation error, serving fallback question: {}", rejection);
            fallback_question()
        }
    };

    Json(QuizResponse { quiz })
}
