mod account;
mod chat;
mod ids;
pub mod progress;
pub mod question;
mod quiz;

pub use ids::{ProgressId, QuizId, UserId};

pub use account::UserAccount;
pub use chat::ChatMessage;
pub use progress::{ProgressEntry, ProgressError, MAX_SCORE};
pub use question::{Question, QuestionDraft, QuestionError, QuestionSet, OPTION_COUNT};
pub use quiz::QuizRecord;
