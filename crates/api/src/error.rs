use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use services::{AuthError, ProgressServiceError, QuizServiceError, TutorServiceError};
use storage::StorageError;

/// The single error shape handlers return; maps every service failure onto
/// an HTTP status plus a JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "missing or invalid credential")
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.detail, "request failed");
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.detail,
            }),
        )
            .into_response()
    }
}

fn storage_status(e: &StorageError) -> StatusCode {
    match e {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::Conflict => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Storage(se) => storage_status(se),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<QuizServiceError> for ApiError {
    fn from(e: QuizServiceError) -> Self {
        let status = match &e {
            // The language model misbehaving is an upstream failure.
            QuizServiceError::MalformedReply | QuizServiceError::Question(_) => {
                StatusCode::BAD_GATEWAY
            }
            QuizServiceError::Llm(le) => llm_status(le),
            QuizServiceError::Progress(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuizServiceError::Storage(se) => storage_status(se),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ProgressServiceError> for ApiError {
    fn from(e: ProgressServiceError) -> Self {
        let status = match &e {
            ProgressServiceError::Progress(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProgressServiceError::Storage(se) => storage_status(se),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<TutorServiceError> for ApiError {
    fn from(e: TutorServiceError) -> Self {
        let status = match &e {
            TutorServiceError::Llm(le) => llm_status(le),
            TutorServiceError::Storage(se) => storage_status(se),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

fn llm_status(e: &services::LlmError) -> StatusCode {
    match e {
        services::LlmError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}
