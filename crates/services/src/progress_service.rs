use std::sync::Arc;

use tracing::info;

use storage::repository::{AccountRepository, ProgressRepository};
use tutor_core::Clock;
use tutor_core::analytics::{self, ProgressSummary};
use tutor_core::model::{ProgressEntry, UserId};

use crate::error::ProgressServiceError;

/// Generous per-user cap when loading the full history; a single user's
/// entries are assumed to fit in memory well below this.
pub const PROGRESS_FETCH_LIMIT: u32 = 1000;

/// Manually logged activity earns a tenth of its percentage as XP.
pub const XP_PER_LOGGED_SCORE: u32 = 10;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Serves the analytics summary and records manually logged activity.
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            clock,
            progress,
            accounts,
        }
    }

    /// Load the caller's history and derive the analytics summary.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the history fetch; the aggregation itself
    /// is pure and cannot fail.
    pub async fn stats(&self, user_id: UserId) -> Result<ProgressSummary, ProgressServiceError> {
        let entries = self
            .progress
            .entries_for_user(user_id, PROGRESS_FETCH_LIMIT)
            .await?;
        Ok(analytics::summarize(&entries, self.clock.now()))
    }

    /// Append a manually logged activity and award XP for it.
    ///
    /// Unlike quiz scoring (10 XP per correct answer), logged activity earns
    /// `score / 10` XP, truncated. Returns the XP granted.
    ///
    /// # Errors
    ///
    /// Returns validation errors for an out-of-range score or blank
    /// subject, and storage errors from either write.
    pub async fn log_activity(
        &self,
        user_id: UserId,
        subject: &str,
        topic: &str,
        score: u32,
        completed: bool,
    ) -> Result<u64, ProgressServiceError> {
        let entry = ProgressEntry::new(user_id, subject, topic, score, completed, self.clock.now())?;
        self.progress.append_entry(&entry).await?;

        let xp_gained = u64::from(score / XP_PER_LOGGED_SCORE);
        self.accounts.add_xp(user_id, xp_gained).await?;

        info!(user = %user_id, subject, score, xp = xp_gained, "activity logged");
        Ok(xp_gained)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
