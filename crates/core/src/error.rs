use thiserror::Error;

use crate::model::{DifficultyError, OperatorError, ProblemError};

/// Any domain validation failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error(transparent)]
    Operator(#[from] OperatorError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
