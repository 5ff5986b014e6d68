use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, State};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use tutor_core::analytics::ProgressSummary;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/progress/stats", get(stats))
        .route("/progress/add", post(add))
}

#[derive(Deserialize)]
struct AddRequest {
    subject: String,
    topic: String,
    score: u32,
    #[serde(default)]
    completed: bool,
}

#[derive(Serialize)]
struct AddResponse {
    success: bool,
    xp_gained: u64,
}

async fn stats(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
) -> Result<Json<ProgressSummary>, ApiError> {
    let summary = state.services.progress().stats(user_id).await?;
    Ok(Json(summary))
}

async fn add(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
    Json(req): Json<AddRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let xp_gained = state
        .services
        .progress()
        .log_activity(user_id, &req.subject, &req.topic, req.score, req.completed)
        .await?;

    Ok(Json(AddResponse {
        success: true,
        xp_gained,
    }))
}
