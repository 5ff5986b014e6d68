use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, Path, Query};
use axum::routing::get;
use serde::{Deserialize, Serialize};

use services::catalog::{self, LearningModule};

use crate::error::ApiError;
use crate::state::AppState;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/modules/list", get(list))
        .route("/modules/:id", get(get_module))
}

#[derive(Deserialize)]
struct ListQuery {
    subject: Option<String>,
}

#[derive(Serialize)]
struct ListResponse {
    modules: Vec<LearningModule>,
}

async fn list(Query(query): Query<ListQuery>) -> Json<ListResponse> {
    Json(ListResponse {
        modules: catalog::list(query.subject.as_deref()),
    })
}

async fn get_module(Path(id): Path<String>) -> Result<Json<LearningModule>, ApiError> {
    catalog::get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("module"))
}
