use thiserror::Error;

use crate::model::progress::ProgressError;
use crate::model::question::QuestionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
