use std::sync::Arc;

use tracing::info;

use storage::repository::{AccountRepository, ProgressRepository, QuizRepository};
use tutor_core::Clock;
use tutor_core::model::{ProgressEntry, QuestionDraft, QuestionSet, QuizId, QuizRecord, UserId};
use tutor_core::scoring::{self, ScoreOutcome};

use crate::error::QuizServiceError;
use crate::llm::LanguageModel;

/// Questions requested when the caller does not say how many.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Upper bound on quiz listings.
pub const QUIZ_LIST_LIMIT: u32 = 100;

const GENERATOR_SYSTEM_PROMPT: &str =
    "You are a quiz generator. Create educational multiple-choice questions in JSON format.";

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Generates quizzes through the language model and grades submissions.
pub struct QuizService {
    clock: Clock,
    generator: Arc<dyn LanguageModel>,
    quizzes: Arc<dyn QuizRepository>,
    progress: Arc<dyn ProgressRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: Arc<dyn LanguageModel>,
        quizzes: Arc<dyn QuizRepository>,
        progress: Arc<dyn ProgressRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            clock,
            generator,
            quizzes,
            progress,
            accounts,
        }
    }

    /// Ask the language model for a fresh question set and persist it.
    ///
    /// The model is prompted for a bare JSON array but routinely wraps it in
    /// prose or code fences, so the reply is scanned for its outermost
    /// bracketed span before parsing.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::MalformedReply` when no parsable array is
    /// found, question validation errors for structurally bad questions, and
    /// model/storage failures otherwise.
    pub async fn generate(
        &self,
        user_id: UserId,
        topic: &str,
        num_questions: u32,
    ) -> Result<QuizRecord, QuizServiceError> {
        let prompt = format!(
            "Generate {num_questions} multiple-choice questions about '{topic}'. \
             Return ONLY a JSON array with this exact format: \
             [{{\"question\": \"text\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"correct\": 0}}]. \
             No other text."
        );

        let reply = self.generator.complete(GENERATOR_SYSTEM_PROMPT, &prompt).await?;
        let drafts = extract_question_array(&reply)?;
        let questions = QuestionSet::from_drafts(drafts)?;

        let quiz = QuizRecord::new(user_id, topic, questions, self.clock.now());
        self.quizzes.insert_quiz(&quiz).await?;

        info!(quiz = %quiz.id, topic, questions = quiz.questions.len(), "quiz generated");
        Ok(quiz)
    }

    /// Grade a submission and durably record the outcome.
    ///
    /// Persistence is three sequential, independent writes with no
    /// transaction: quiz result, progress entry, XP increment. A failure
    /// after the first write leaves the quiz scored with no XP awarded;
    /// this inconsistency window is accepted. Nothing guards against scoring the
    /// same quiz twice; a repeat submission re-scores and re-awards XP.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` (wrapped) when the quiz does not
    /// exist or belongs to another user, and storage errors from any of the
    /// three writes.
    pub async fn submit(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
        answers: &[usize],
    ) -> Result<ScoreOutcome, QuizServiceError> {
        let quiz = self.quizzes.get_quiz(quiz_id, user_id).await?;

        let outcome = scoring::grade(&quiz.questions, answers);

        self.quizzes
            .record_result(quiz_id, outcome.correct_count)
            .await?;

        let entry = ProgressEntry::new(
            user_id,
            &quiz.topic,
            &quiz.topic,
            outcome.percentage,
            true,
            self.clock.now(),
        )?;
        self.progress.append_entry(&entry).await?;

        self.accounts.add_xp(user_id, outcome.xp_gained).await?;

        info!(
            quiz = %quiz_id,
            correct = outcome.correct_count,
            total = outcome.total_questions,
            xp = outcome.xp_gained,
            "quiz scored"
        );
        Ok(outcome)
    }

    /// The caller's quizzes, newest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the listing query.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<QuizRecord>, QuizServiceError> {
        Ok(self.quizzes.list_quizzes(user_id, QUIZ_LIST_LIMIT).await?)
    }
}

/// Pull the outermost `[...]` span out of a model reply and parse it.
fn extract_question_array(reply: &str) -> Result<Vec<QuestionDraft>, QuizServiceError> {
    let start = reply.find('[').ok_or(QuizServiceError::MalformedReply)?;
    let end = reply.rfind(']').ok_or(QuizServiceError::MalformedReply)?;
    if end < start {
        return Err(QuizServiceError::MalformedReply);
    }
    serde_json::from_str(&reply[start..=end]).map_err(|_| QuizServiceError::MalformedReply)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::InMemoryRepository;
    use tutor_core::model::UserAccount;
    use tutor_core::time::fixed_now;

    use crate::llm::LlmError;

    struct ScriptedModel {
        reply: String,
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.reply.clone())
        }
    }

    const FIVE_QUESTIONS: &str = r#"Here is your quiz:
```json
[
 {"question": "Q0", "options": ["A", "B", "C", "D"], "correct": 0},
 {"question": "Q1", "options": ["A", "B", "C", "D"], "correct": 1},
 {"question": "Q2", "options": ["A", "B", "C", "D"], "correct": 2},
 {"question": "Q3", "options": ["A", "B", "C", "D"], "correct": 3},
 {"question": "Q4", "options": ["A", "B", "C", "D"], "correct": 0}
]
```
Good luck!"#;

    fn service(repo: &InMemoryRepository, reply: &str) -> QuizService {
        QuizService::new(
            Clock::fixed(fixed_now()),
            Arc::new(ScriptedModel {
                reply: reply.to_string(),
            }),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    async fn register(repo: &InMemoryRepository) -> UserId {
        let account = UserAccount::new("a@b.c", "A", "hash", fixed_now());
        storage::repository::AccountRepository::insert_account(repo, &account)
            .await
            .unwrap();
        account.id
    }

    #[tokio::test]
    async fn generate_parses_fenced_reply_and_persists() {
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        let service = service(&repo, FIVE_QUESTIONS);

        let quiz = service.generate(user, "Fractions", 5).await.unwrap();

        assert_eq!(quiz.topic, "Fractions");
        assert_eq!(quiz.questions.len(), 5);
        assert_eq!(quiz.score, None);
        assert!(!quiz.completed);

        let stored = storage::repository::QuizRepository::get_quiz(&repo, quiz.id, user)
            .await
            .unwrap();
        assert_eq!(stored.questions.questions()[4].correct(), 0);
    }

    #[tokio::test]
    async fn generate_rejects_reply_without_an_array() {
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        let service = service(&repo, "Sorry, I cannot help with that.");

        let err = service.generate(user, "Fractions", 5).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::MalformedReply));
    }

    #[tokio::test]
    async fn generate_rejects_structurally_bad_questions() {
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        // Three options instead of four.
        let service = service(
            &repo,
            r#"[{"question": "Q", "options": ["A", "B", "C"], "correct": 0}]"#,
        );

        let err = service.generate(user, "Fractions", 1).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::Question(_)));
    }

    #[tokio::test]
    async fn submit_scores_persists_progress_and_awards_xp() {
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        let service = service(&repo, FIVE_QUESTIONS);
        let quiz = service.generate(user, "Fractions", 5).await.unwrap();

        let outcome = service.submit(user, quiz.id, &[0, 1, 0, 3, 0]).await.unwrap();

        assert_eq!(outcome.correct_count, 4);
        assert_eq!(outcome.total_questions, 5);
        assert_eq!(outcome.percentage, 80);
        assert_eq!(outcome.xp_gained, 40);

        let stored = storage::repository::QuizRepository::get_quiz(&repo, quiz.id, user)
            .await
            .unwrap();
        assert_eq!(stored.score, Some(4));
        assert!(stored.completed);

        let entries = storage::repository::ProgressRepository::entries_for_user(&repo, user, 100)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, "Fractions");
        assert_eq!(entries[0].topic, "Fractions");
        assert_eq!(entries[0].score, 80);
        assert!(entries[0].completed);

        let account = storage::repository::AccountRepository::get_account(&repo, user)
            .await
            .unwrap();
        assert_eq!(account.xp, 40);
    }

    #[tokio::test]
    async fn submitting_someone_elses_quiz_is_not_found() {
        let repo = InMemoryRepository::new();
        let owner = register(&repo).await;
        let service = service(&repo, FIVE_QUESTIONS);
        let quiz = service.generate(owner, "Fractions", 5).await.unwrap();

        let err = service
            .submit(UserId::generate(), quiz.id, &[0])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::Storage(storage::StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn short_answer_sheet_grades_only_the_prefix() {
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        let service = service(&repo, FIVE_QUESTIONS);
        let quiz = service.generate(user, "Fractions", 5).await.unwrap();

        let outcome = service.submit(user, quiz.id, &[0, 1]).await.unwrap();

        assert_eq!(outcome.correct_count, 2);
        assert_eq!(outcome.total_questions, 5);
        assert_eq!(outcome.percentage, 40);
    }

    #[tokio::test]
    async fn resubmission_rescores_and_awards_xp_again() {
        // Documents the absence of an idempotence guard: both submissions
        // succeed and XP is granted twice.
        let repo = InMemoryRepository::new();
        let user = register(&repo).await;
        let service = service(&repo, FIVE_QUESTIONS);
        let quiz = service.generate(user, "Fractions", 5).await.unwrap();

        service.submit(user, quiz.id, &[0, 1, 2, 3, 0]).await.unwrap();
        service.submit(user, quiz.id, &[0, 1, 2, 3, 0]).await.unwrap();

        let account = storage::repository::AccountRepository::get_account(&repo, user)
            .await
            .unwrap();
        assert_eq!(account.xp, 100);

        let entries = storage::repository::ProgressRepository::entries_for_user(&repo, user, 100)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
