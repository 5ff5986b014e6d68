use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use tutor_core::model::{ChatMessage, ProgressEntry, QuizId, QuizRecord, UserAccount, UserId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of an issued bearer credential.
///
/// Tokens are opaque; validity is purely `expires_at` against the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for user accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered,
    /// or other storage errors.
    async fn insert_account(&self, account: &UserAccount) -> Result<(), StorageError>;

    /// Fetch an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_account(&self, id: UserId) -> Result<UserAccount, StorageError>;

    /// Fetch an account by email, if registered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError>;

    /// Atomically add experience points to an account.
    ///
    /// XP never decreases; this is the only mutation the scorer performs on
    /// accounts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the account is missing.
    async fn add_xp(&self, id: UserId, amount: u64) -> Result<(), StorageError>;
}

/// Repository contract for issued bearer credentials.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a newly issued session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn insert_session(&self, session: &AuthSession) -> Result<(), StorageError>;

    /// Look up a session by its opaque token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_session(&self, token: &str) -> Result<Option<AuthSession>, StorageError>;
}

/// Repository contract for quiz records.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a freshly generated quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn insert_quiz(&self, quiz: &QuizRecord) -> Result<(), StorageError>;

    /// Fetch a quiz owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the quiz does not exist *or*
    /// belongs to someone else; ownership failures are indistinguishable
    /// from absence.
    async fn get_quiz(&self, id: QuizId, owner: UserId) -> Result<QuizRecord, StorageError>;

    /// The user's quizzes, newest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_quizzes(&self, owner: UserId, limit: u32)
    -> Result<Vec<QuizRecord>, StorageError>;

    /// Record a grading outcome: sets the raw score and the completed flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the quiz is missing.
    async fn record_result(&self, id: QuizId, score: u32) -> Result<(), StorageError>;
}

/// Repository contract for the append-only progress log.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Append one progress entry. Entries are never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &ProgressEntry) -> Result<(), StorageError>;

    /// The user's entries, oldest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn entries_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ProgressEntry>, StorageError>;
}

/// Repository contract for assistant chat history.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Append one stored exchange.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the message cannot be stored.
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError>;

    /// The user's exchanges, oldest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn history_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    accounts: Arc<Mutex<HashMap<UserId, UserAccount>>>,
    sessions: Arc<Mutex<HashMap<String, AuthSession>>>,
    quizzes: Arc<Mutex<HashMap<QuizId, QuizRecord>>>,
    progress: Arc<Mutex<Vec<ProgressEntry>>>,
    chat: Arc<Mutex<Vec<ChatMessage>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<'a, T>(guard: &'a Arc<Mutex<T>>) -> Result<std::sync::MutexGuard<'a, T>, StorageError> {
        guard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_account(&self, account: &UserAccount) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.accounts)?;
        if guard.values().any(|a| a.email == account.email) {
            return Err(StorageError::Conflict);
        }
        guard.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, id: UserId) -> Result<UserAccount, StorageError> {
        let guard = Self::lock(&self.accounts)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError> {
        let guard = Self::lock(&self.accounts)?;
        Ok(guard.values().find(|a| a.email == email).cloned())
    }

    async fn add_xp(&self, id: UserId, amount: u64) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.accounts)?;
        let account = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        account.xp += amount;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn insert_session(&self, session: &AuthSession) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.sessions)?;
        guard.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<AuthSession>, StorageError> {
        let guard = Self::lock(&self.sessions)?;
        Ok(guard.get(token).cloned())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn insert_quiz(&self, quiz: &QuizRecord) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.quizzes)?;
        guard.insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId, owner: UserId) -> Result<QuizRecord, StorageError> {
        let guard = Self::lock(&self.quizzes)?;
        guard
            .get(&id)
            .filter(|q| q.user_id == owner)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(
        &self,
        owner: UserId,
        limit: u32,
    ) -> Result<Vec<QuizRecord>, StorageError> {
        let guard = Self::lock(&self.quizzes)?;
        let mut quizzes: Vec<QuizRecord> =
            guard.values().filter(|q| q.user_id == owner).cloned().collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        quizzes.truncate(limit as usize);
        Ok(quizzes)
    }

    async fn record_result(&self, id: QuizId, score: u32) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.quizzes)?;
        let quiz = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        quiz.score = Some(score);
        quiz.completed = true;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &ProgressEntry) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.progress)?;
        guard.push(entry.clone());
        Ok(())
    }

    async fn entries_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ProgressEntry>, StorageError> {
        let guard = Self::lock(&self.progress)?;
        let mut entries: Vec<ProgressEntry> = guard
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[async_trait]
impl ChatRepository for InMemoryRepository {
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.chat)?;
        guard.push(message.clone());
        Ok(())
    }

    async fn history_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StorageError> {
        let guard = Self::lock(&self.chat)?;
        let mut history: Vec<ChatMessage> = guard
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        history.truncate(limit as usize);
        Ok(history)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the document-store collections behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub chat: Arc<dyn ChatRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            accounts: Arc::new(repo.clone()),
            sessions: Arc::new(repo.clone()),
            quizzes: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            chat: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{QuestionDraft, QuestionSet};
    use tutor_core::time::fixed_now;

    fn build_quiz(owner: UserId) -> QuizRecord {
        let questions = QuestionSet::from_drafts(vec![QuestionDraft {
            prompt: "Q".into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: 0,
        }])
        .unwrap();
        QuizRecord::new(owner, "Fractions", questions, fixed_now())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryRepository::new();
        let first = UserAccount::new("a@b.c", "Asha", "hash", fixed_now());
        let second = UserAccount::new("a@b.c", "Other", "hash", fixed_now());

        repo.insert_account(&first).await.unwrap();
        let err = repo.insert_account(&second).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn quiz_lookup_enforces_ownership() {
        let repo = InMemoryRepository::new();
        let owner = UserId::generate();
        let quiz = build_quiz(owner);
        repo.insert_quiz(&quiz).await.unwrap();

        assert!(repo.get_quiz(quiz.id, owner).await.is_ok());
        let err = repo.get_quiz(quiz.id, UserId::generate()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn record_result_marks_quiz_completed() {
        let repo = InMemoryRepository::new();
        let owner = UserId::generate();
        let quiz = build_quiz(owner);
        repo.insert_quiz(&quiz).await.unwrap();

        repo.record_result(quiz.id, 1).await.unwrap();

        let fetched = repo.get_quiz(quiz.id, owner).await.unwrap();
        assert_eq!(fetched.score, Some(1));
        assert!(fetched.completed);
    }

    #[tokio::test]
    async fn xp_accumulates() {
        let repo = InMemoryRepository::new();
        let account = UserAccount::new("a@b.c", "Asha", "hash", fixed_now());
        repo.insert_account(&account).await.unwrap();

        repo.add_xp(account.id, 40).await.unwrap();
        repo.add_xp(account.id, 10).await.unwrap();

        let fetched = repo.get_account(account.id).await.unwrap();
        assert_eq!(fetched.xp, 50);
    }

    #[tokio::test]
    async fn progress_entries_come_back_oldest_first() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        let now = fixed_now();

        let later =
            ProgressEntry::new(user, "Math", "b", 80, true, now + chrono::Duration::hours(1))
                .unwrap();
        let earlier = ProgressEntry::new(user, "Math", "a", 50, true, now).unwrap();
        repo.append_entry(&later).await.unwrap();
        repo.append_entry(&earlier).await.unwrap();

        let entries = repo.entries_for_user(user, 100).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].topic, "a");
        assert_eq!(entries[1].topic, "b");
    }
}
