use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,

    #[error("question must have exactly {OPTION_COUNT} options, got {0}")]
    WrongOptionCount(usize),

    #[error("correct option index {0} is out of range")]
    CorrectOutOfRange(usize),

    #[error("a quiz needs at least one question")]
    EmptySet,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question shape, as received from the language-model service
/// or deserialized from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl QuestionDraft {
    /// Validate the draft into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, the option count is
    /// not exactly [`OPTION_COUNT`], or the correct index is out of range.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount(self.options.len()));
        }
        if self.correct >= self.options.len() {
            return Err(QuestionError::CorrectOutOfRange(self.correct));
        }
        Ok(Question {
            prompt: self.prompt,
            options: self.options,
            correct: self.correct,
        })
    }
}

/// A single validated multiple-choice question.
///
/// Immutable once constructed; `correct` is the zero-based index of the
/// right answer within `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Zero-based index of the correct option.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// The fixed, ordered list of questions belonging to one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    /// Validate a batch of drafts into a non-empty question set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySet` for an empty batch, or the first
    /// per-question validation failure.
    pub fn from_drafts(drafts: Vec<QuestionDraft>) -> Result<Self, QuestionError> {
        if drafts.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        let questions = drafts
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(questions))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
