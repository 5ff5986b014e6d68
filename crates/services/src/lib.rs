#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog;
pub mod error;
pub mod llm;
pub mod progress_service;
pub mod quiz_service;
pub mod tutor_service;

pub use tutor_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, TOKEN_TTL_DAYS};
pub use catalog::LearningModule;
pub use error::{
    AppServicesError, AuthError, ProgressServiceError, QuizServiceError, TutorServiceError,
};
pub use llm::{LanguageModel, LlmConfig, LlmError, OpenAiChatClient};
pub use progress_service::ProgressService;
pub use quiz_service::QuizService;
pub use tutor_service::TutorService;
