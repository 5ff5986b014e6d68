use std::sync::Arc;

use storage::repository::Storage;
use tutor_core::Clock;

use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::llm::LanguageModel;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::tutor_service::TutorService;

/// Assembles the backend-facing services over one storage backend and one
/// language-model client.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    quizzes: Arc<QuizService>,
    progress: Arc<ProgressService>,
    tutor: Arc<TutorService>,
}

impl AppServices {
    /// Wire services over an existing storage backend.
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage, model: Arc<dyn LanguageModel>) -> Self {
        let auth = Arc::new(AuthService::new(
            clock,
            Arc::clone(&storage.accounts),
            Arc::clone(&storage.sessions),
        ));
        let quizzes = Arc::new(QuizService::new(
            clock,
            Arc::clone(&model),
            Arc::clone(&storage.quizzes),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.accounts),
        ));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&storage.accounts),
        ));
        let tutor = Arc::new(TutorService::new(clock, model, Arc::clone(&storage.chat)));

        Self {
            auth,
            quizzes,
            progress,
            tutor,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(clock, &storage, model))
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }
}
