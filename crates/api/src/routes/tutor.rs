use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, State};
use axum::routing::post;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/ai/tutor", post(lesson))
        .route("/ai/chat", post(chat))
}

fn default_language() -> String {
    "English".to_string()
}

#[derive(Deserialize)]
struct LessonRequest {
    topic: String,
    #[serde(default = "default_language")]
    language: String,
}

#[derive(Serialize)]
struct LessonResponse {
    lesson: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_language")]
    language: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

async fn lesson(
    State(state): State<AppStateArc>,
    Caller(_user_id): Caller,
    Json(req): Json<LessonRequest>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = state
        .services
        .tutor()
        .lesson(&req.topic, &req.language)
        .await?;

    Ok(Json(LessonResponse { lesson }))
}

async fn chat(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state
        .services
        .tutor()
        .chat(user_id, &req.message, &req.language)
        .await?;

    Ok(Json(ChatResponse { response }))
}
