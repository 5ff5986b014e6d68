//! HTTP surface for the tutor backend.
//!
//! Routes live under `/api`; everything except signup, login, and the module
//! catalog requires a bearer credential.

#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the full application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth::routes())
        .merge(routes::quiz::routes())
        .merge(routes::progress::routes())
        .merge(routes::tutor::routes())
        .merge(routes::modules::routes());

    Router::new()
        .nest("/api", api)
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, router(state)).await
}
