//! Drives the full HTTP surface over in-memory storage and a scripted
//! language model: signup, quiz generate/submit, analytics, catalog.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use api::{AppState, router};
use services::llm::{LanguageModel, LlmError};
use services::{AppServices, Clock};
use storage::repository::Storage;
use tutor_core::time::fixed_now;

struct ScriptedModel;

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, system: &str, _prompt: &str) -> Result<String, LlmError> {
        if system.contains("quiz generator") {
            Ok(r#"[
                {"question": "Q0", "options": ["A", "B", "C", "D"], "correct": 0},
                {"question": "Q1", "options": ["A", "B", "C", "D"], "correct": 1},
                {"question": "Q2", "options": ["A", "B", "C", "D"], "correct": 2},
                {"question": "Q3", "options": ["A", "B", "C", "D"], "correct": 3},
                {"question": "Q4", "options": ["A", "B", "C", "D"], "correct": 0}
            ]"#
            .to_string())
        } else {
            Ok("A gentle explanation.".to_string())
        }
    }
}

fn app() -> Router {
    let storage = Storage::in_memory();
    let services = AppServices::new(
        Clock::fixed(fixed_now()),
        &storage,
        Arc::new(ScriptedModel),
    );
    router(AppState::new(services))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({"email": email, "name": "Asha", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_login_and_me() {
    let app = app();
    let token = signup(&app, "asha@example.org").await;

    let (status, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "asha@example.org");
    assert_eq!(me["xp"], 0);
    assert_eq!(me["level"], 1);
    assert!(me.get("password_hash").is_none());

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "asha@example.org", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(login["token"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "asha@example.org", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = app();
    signup(&app, "asha@example.org").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({"email": "asha@example.org", "name": "Other", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn protected_routes_require_a_credential() {
    let app = app();

    for (method, uri) in [
        ("GET", "/api/auth/me"),
        ("GET", "/api/quiz/list"),
        ("GET", "/api/progress/stats"),
    ] {
        let (status, _) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("bogus-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn quiz_lifecycle_over_http() {
    let app = app();
    let token = signup(&app, "ravi@example.org").await;

    let (status, generated) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(&token),
        Some(json!({"topic": "Fractions"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let quiz_id = generated["quiz_id"].as_str().unwrap().to_string();
    assert_eq!(generated["questions"].as_array().unwrap().len(), 5);

    let (status, outcome) = send(
        &app,
        "POST",
        "/api/quiz/submit",
        Some(&token),
        Some(json!({"quiz_id": quiz_id, "answers": [0, 1, 0, 3, 0]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["correct_count"], 4);
    assert_eq!(outcome["total_questions"], 5);
    assert_eq!(outcome["percentage"], 80);
    assert_eq!(outcome["xp_gained"], 40);

    let (status, list) = send(&app, "GET", "/api/quiz/list", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let quizzes = list["quizzes"].as_array().unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0]["score"], 4);
    assert_eq!(quizzes[0]["completed"], true);

    let (status, stats) = send(&app, "GET", "/api/progress/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_completed"], 1);
    assert_eq!(stats["average_score"], 80);
    assert_eq!(stats["strengths"], json!(["Fractions"]));
    assert_eq!(stats["weekly_progress"].as_array().unwrap().len(), 7);

    let (status, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["xp"], 40);
}

#[tokio::test]
async fn submitting_an_unknown_quiz_is_not_found() {
    let app = app();
    let token = signup(&app, "x@example.org").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/quiz/submit",
        Some(&token),
        Some(json!({
            "quiz_id": "00000000-0000-4000-8000-000000000000",
            "answers": [0]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn manual_progress_rejects_out_of_range_scores() {
    let app = app();
    let token = signup(&app, "p@example.org").await;

    let (status, added) = send(
        &app,
        "POST",
        "/api/progress/add",
        Some(&token),
        Some(json!({"subject": "Math", "topic": "Algebra", "score": 85, "completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["success"], true);
    assert_eq!(added["xp_gained"], 8);

    let (status, _) = send(
        &app,
        "POST",
        "/api/progress/add",
        Some(&token),
        Some(json!({"subject": "Math", "topic": "Algebra", "score": 101})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn tutor_routes_proxy_the_model() {
    let app = app();
    let token = signup(&app, "t@example.org").await;

    let (status, lesson) = send(
        &app,
        "POST",
        "/api/ai/tutor",
        Some(&token),
        Some(json!({"topic": "Photosynthesis"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lesson["lesson"], "A gentle explanation.");

    let (status, chat) = send(
        &app,
        "POST",
        "/api/ai/chat",
        Some(&token),
        Some(json!({"message": "Why is the sky blue?", "language": "Hindi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["response"], "A gentle explanation.");
}

#[tokio::test]
async fn module_catalog_is_public() {
    let app = app();

    let (status, all) = send(&app, "GET", "/api/modules/list", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["modules"].as_array().unwrap().len(), 6);

    let (status, science) =
        send(&app, "GET", "/api/modules/list?subject=science", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(science["modules"].as_array().unwrap().len(), 3);

    let (status, module) = send(&app, "GET", "/api/modules/math-fractions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(module["title"], "Understanding Fractions");
    assert_eq!(module["estimatedTime"], "25 mins");

    let (status, _) = send(&app, "GET", "/api/modules/no-such", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
