use std::sync::Arc;

use tracing::info;

use storage::repository::ChatRepository;
use tutor_core::Clock;
use tutor_core::model::{ChatMessage, UserId};

use crate::error::TutorServiceError;
use crate::llm::LanguageModel;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Proxies lesson and chat requests to the language model.
///
/// Chat exchanges are persisted; lessons are not.
pub struct TutorService {
    clock: Clock,
    model: Arc<dyn LanguageModel>,
    chat: Arc<dyn ChatRepository>,
}

impl TutorService {
    #[must_use]
    pub fn new(clock: Clock, model: Arc<dyn LanguageModel>, chat: Arc<dyn ChatRepository>) -> Self {
        Self { clock, model, chat }
    }

    /// Ask the model for a structured lesson on a topic.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` (wrapped) when the model is unconfigured or the
    /// request fails.
    pub async fn lesson(&self, topic: &str, language: &str) -> Result<String, TutorServiceError> {
        let system = format!(
            "You are an expert educational tutor. Explain topics clearly in {language} \
             with examples and diagrams. Use simple language for rural students."
        );
        let prompt = format!(
            "Teach me about '{topic}' in {language}. Include: 1) Simple explanation \
             2) Real-world examples 3) Key points to remember. Make it engaging for rural students."
        );

        let lesson = self.model.complete(&system, &prompt).await?;
        info!(topic, language, "lesson generated");
        Ok(lesson)
    }

    /// Answer a free-form question and store the exchange in the caller's
    /// chat history.
    ///
    /// # Errors
    ///
    /// Returns model failures, or storage errors from persisting the
    /// exchange (in which case the reply is not returned either).
    pub async fn chat(
        &self,
        user_id: UserId,
        message: &str,
        language: &str,
    ) -> Result<String, TutorServiceError> {
        let system = format!(
            "You are a friendly AI learning assistant speaking in {language}. Help students \
             understand concepts, answer questions, and encourage learning. Be supportive and clear."
        );

        let response = self.model.complete(&system, message).await?;

        let record = ChatMessage::new(user_id, message, &response, self.clock.now());
        self.chat.append_message(&record).await?;

        Ok(response)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
