use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{QuizId, UserId};
use crate::model::question::QuestionSet;

/// A generated quiz and, once submitted, its grading outcome.
///
/// Created with `score = None, completed = false`; the scorer sets both
/// exactly once. `score` is the raw correct count, not a percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: QuizId,
    pub user_id: UserId,
    pub topic: String,
    pub questions: QuestionSet,
    pub score: Option<u32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl QuizRecord {
    /// A freshly generated, not-yet-attempted quiz.
    #[must_use]
    pub fn new(
        user_id: UserId,
        topic: impl Into<String>,
        questions: QuestionSet,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuizId::generate(),
            user_id,
            topic: topic.into(),
            questions,
            score: None,
            completed: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{QuestionDraft, QuestionSet};
    use crate::time::fixed_now;

    fn one_question_set() -> QuestionSet {
        QuestionSet::from_drafts(vec![QuestionDraft {
            prompt: "Q".into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: 0,
        }])
        .unwrap()
    }

    #[test]
    fn new_quiz_starts_unscored() {
        let quiz = QuizRecord::new(UserId::generate(), "Fractions", one_question_set(), fixed_now());
        assert_eq!(quiz.score, None);
        assert!(!quiz.completed);
        assert_eq!(quiz.topic, "Fractions");
        assert_eq!(quiz.created_at, fixed_now());
    }
}
