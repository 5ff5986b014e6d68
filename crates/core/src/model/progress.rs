use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ProgressId, UserId};

/// Progress scores are percentages.
pub const MAX_SCORE: u32 = 100;

/// Errors that can occur when recording progress.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("progress score {0} exceeds {MAX_SCORE}")]
    ScoreOutOfRange(u32),

    #[error("subject must not be empty")]
    EmptySubject,
}

/// One append-only record of learning activity.
///
/// `score` is a percentage in `[0, 100]`, distinct from a quiz record's raw
/// correct count. Entries are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: ProgressId,
    pub user_id: UserId,
    pub subject: String,
    pub topic: String,
    pub score: u32,
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEntry {
    /// Create a validated entry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the score exceeds [`MAX_SCORE`] or the
    /// subject is blank.
    pub fn new(
        user_id: UserId,
        subject: impl Into<String>,
        topic: impl Into<String>,
        score: u32,
        completed: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ProgressError::EmptySubject);
        }
        if score > MAX_SCORE {
            return Err(ProgressError::ScoreOutOfRange(score));
        }
        Ok(Self {
            id: ProgressId::generate(),
            user_id,
            subject,
            topic: topic.into(),
            score,
            completed,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn entry_within_range_is_accepted() {
        let entry = ProgressEntry::new(
            UserId::generate(),
            "Math",
            "Fractions",
            100,
            true,
            fixed_now(),
        )
        .unwrap();
        assert_eq!(entry.score, 100);
        assert!(entry.completed);
    }

    #[test]
    fn score_above_100_is_rejected() {
        let err = ProgressEntry::new(UserId::generate(), "Math", "t", 101, true, fixed_now())
            .unwrap_err();
        assert_eq!(err, ProgressError::ScoreOutOfRange(101));
    }

    #[test]
    fn blank_subject_is_rejected() {
        let err =
            ProgressEntry::new(UserId::generate(), "  ", "t", 50, false, fixed_now()).unwrap_err();
        assert_eq!(err, ProgressError::EmptySubject);
    }
}
