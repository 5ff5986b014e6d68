use serde::{Deserialize, Serialize};

use crate::model::QuestionSet;

/// Experience points awarded per correctly answered question.
pub const XP_PER_CORRECT: u64 = 10;

//
// ─── SCORE OUTCOME ─────────────────────────────────────────────────────────────
//

/// Result of grading one submitted answer sheet against a question set.
///
/// `correct_count` is the raw number of matches, `percentage` the rounded
/// correctness ratio in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub correct_count: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub xp_gained: u64,
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Grade submitted answer indices against a question set.
///
/// Only the overlap is compared: a shorter answer list grades the provided
/// prefix, and answers beyond the question count are ignored. The percentage
/// is rounded to the nearest integer, unlike the analytics averages, which
/// truncate.
///
/// ```
/// # use tutor_core::model::{QuestionDraft, QuestionSet};
/// # use tutor_core::scoring::grade;
/// let drafts = (0..5)
///     .map(|i| QuestionDraft {
///         prompt: format!("Q{i}"),
///         options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
///         correct: [0, 1, 2, 3, 0][i],
///     })
///     .collect();
/// let questions = QuestionSet::from_drafts(drafts).unwrap();
///
/// let outcome = grade(&questions, &[0, 1, 0, 3, 0]);
/// assert_eq!(outcome.correct_count, 4);
/// assert_eq!(outcome.percentage, 80);
/// assert_eq!(outcome.xp_gained, 40);
/// ```
#[must_use]
pub fn grade(questions: &QuestionSet, answers: &[usize]) -> ScoreOutcome {
    let correct_count = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.correct() == **answer)
        .count();

    // Question sets are non-empty by construction, so the division is safe.
    // Counts are bounded by the question set length, far below u32::MAX.
    #[allow(clippy::cast_possible_truncation)]
    let correct_count = correct_count as u32;
    #[allow(clippy::cast_possible_truncation)]
    let total_questions = questions.len() as u32;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percentage =
        ((f64::from(correct_count) / f64::from(total_questions)) * 100.0).round() as u32;

    ScoreOutcome {
        correct_count,
        total_questions,
        percentage,
        xp_gained: u64::from(correct_count) * XP_PER_CORRECT,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question_set(correct: &[usize]) -> QuestionSet {
        let drafts = correct
            .iter()
            .enumerate()
            .map(|(i, c)| QuestionDraft {
                prompt: format!("Q{i}"),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct: *c,
            })
            .collect();
        QuestionSet::from_drafts(drafts).unwrap()
    }

    #[test]
    fn four_of_five_scores_eighty_percent() {
        let questions = question_set(&[0, 1, 2, 3, 0]);
        let outcome = grade(&questions, &[0, 1, 0, 3, 0]);

        assert_eq!(outcome.correct_count, 4);
        assert_eq!(outcome.total_questions, 5);
        assert_eq!(outcome.percentage, 80);
        assert_eq!(outcome.xp_gained, 40);
    }

    #[test]
    fn all_correct_scores_one_hundred() {
        let questions = question_set(&[2, 2, 1]);
        let outcome = grade(&questions, &[2, 2, 1]);

        assert_eq!(outcome.correct_count, 3);
        assert_eq!(outcome.percentage, 100);
        assert_eq!(outcome.xp_gained, 30);
    }

    #[test]
    fn empty_answer_sheet_scores_zero() {
        let questions = question_set(&[0, 1]);
        let outcome = grade(&questions, &[]);

        assert_eq!(outcome.correct_count, 0);
        assert_eq!(outcome.percentage, 0);
        assert_eq!(outcome.xp_gained, 0);
    }

    #[test]
    fn short_answer_sheet_grades_only_the_prefix() {
        let questions = question_set(&[0, 1, 2]);
        let outcome = grade(&questions, &[0]);

        assert_eq!(outcome.correct_count, 1);
        assert_eq!(outcome.total_questions, 3);
        assert_eq!(outcome.percentage, 33);
    }

    #[test]
    fn extra_answers_beyond_the_question_count_are_ignored() {
        let questions = question_set(&[0, 1]);
        let outcome = grade(&questions, &[0, 1, 3, 3, 3]);

        assert_eq!(outcome.correct_count, 2);
        assert_eq!(outcome.total_questions, 2);
        assert_eq!(outcome.percentage, 100);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        // 2 of 3 = 66.67 rounds up, 1 of 3 = 33.33 rounds down.
        let questions = question_set(&[0, 0, 0]);
        assert_eq!(grade(&questions, &[0, 0, 1]).percentage, 67);
        assert_eq!(grade(&questions, &[0, 1, 1]).percentage, 33);
    }

    #[test]
    fn wrong_option_never_scores() {
        let questions = question_set(&[3]);
        let outcome = grade(&questions, &[1]);

        assert_eq!(outcome.correct_count, 0);
        assert_eq!(outcome.xp_gained, 0);
    }
}
