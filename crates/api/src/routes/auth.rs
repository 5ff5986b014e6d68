use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, State};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use tutor_core::model::{UserAccount, UserId};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[derive(Deserialize)]
struct SignupRequest {
    email: String,
    name: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Public view of an account: everything except the password hash.
#[derive(Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub xp: u64,
    pub level: u32,
    pub badges: Vec<String>,
    pub language: String,
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            xp: account.xp,
            level: account.level,
            badges: account.badges,
            language: account.language,
        }
    }
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user: UserView,
}

async fn signup(
    State(state): State<AppStateArc>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, account) = state
        .services
        .auth()
        .signup(&req.email, &req.name, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

async fn login(
    State(state): State<AppStateArc>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, account) = state
        .services
        .auth()
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

async fn me(
    State(state): State<AppStateArc>,
    Caller(user_id): Caller,
) -> Result<Json<UserView>, ApiError> {
    let account = state.services.auth().account(user_id).await?;
    Ok(Json(account.into()))
}
