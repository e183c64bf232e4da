mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

fn assert_valid_quiz(body: &Value) {
    let quiz = &body["quiz"];
    let options = quiz["options"].as_array().expect("options");
    assert!(quiz["question"].is_string());
    assert!(quiz["explanation"].is_string());
    assert!(options.contains(&quiz["correctAnswer"]), "correctAnswer not in options: {}", quiz);
}

#[tokio::test]
async fn every_topic_yields_a_valid_question() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.seed_user("ada").await;

    for topic in ["intro-python", "variables", "control-flow", "unknown-topic", ""] {
        let (status, body) = app
            .post("/api/tutor/generate-quiz", Some(&token), json!({ "topic": topic }))
            .await?;
        assert_eq!(status, StatusCode::OK, "topic {}", topic);
        assert_valid_quiz(&body);
    }
    Ok(())
}

#[tokio::test]
async fn advanced_hint_is_appended_once_per_draw() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.seed_user("ada").await;

    for _ in 0..10 {
        let (status, body) = app
            .post(
                "/api/tutor/generate-quiz",
                Some(&token),
                json!({ "topic": "variables", "difficulty": "advanced" }),
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        let explanation = body["quiz"]["explanation"].as_str().unwrap();
        assert_eq!(explanation.matches("Try to think about edge cases!").count(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn unparseable_body_serves_fallback_question() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.seed_user("ada").await;

    let (status, body) = app.post_raw("/api/tutor/generate-quiz", &token, "nonsense").await?;
    assert_eq!(status, StatusCode::OK);
    assert_valid_quiz(&body);
    assert_eq!(body["quiz"]["question"], "What is the output of print(2 + 3)?");
    Ok(())
}
