use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, State};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use services::quiz_service::DEFAULT_QUESTION_COUNT;
use tutor_core::model::{QuestionSet, QuizId, QuizRecord};
use tutor_core::scoring::ScoreOutcome;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/quiz/generate", post(generate))
        .route("/quiz/submit", post(submit))
        .route("/quiz/list", get(list))
}

#[derive(Deserialize)]
struct GenerateRequest {
    topic: String,
    #[serde(default = "default_question_count")]
    num_questions: u32,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

#[derive(Serialize)]
struct GenerateResponse {
    quiz_id: QuizId,
    questions: QuestionSet,
}

#[derive(Deserialize)]
struct SubmitRequest {
    quiz_id: QuizId,
    answers: Vec<usize>,
}

#[derive(Serialize)]
struct ListResponse {
    quizzes: Vec<QuizRecord>,
}

async fn generate(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let quiz = state
        .services
        .quizzes()
        .generate(user_id, &req.topic, req.num_questions)
        .await?;

    Ok(Json(GenerateResponse {
        quiz_id: quiz.id,
        questions: quiz.questions,
    }))
}

async fn submit(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<ScoreOutcome>, ApiError> {
    let outcome = state
        .services
        .quizzes()
        .submit(user_id, req.quiz_id, &req.answers)
        .await?;

    Ok(Json(outcome))
}

async fn list(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
) -> Result<Json<ListResponse>, ApiError> {
    let quizzes = state.services.quizzes().list(user_id).await?;
    Ok(Json(ListResponse { quizzes }))
}
