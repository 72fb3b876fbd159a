use std::fmt;

use thiserror::Error;

use crate::model::Operator;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("operands must be positive, got {a} and {b}")]
    NonPositiveOperand { a: i64, b: i64 },
}

/// A single arithmetic problem shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Problem {
    pub a: i64,
    pub b: i64,
    pub operator: Operator,
}

impl Problem {
    #[must_use]
    pub fn new(a: i64, b: i64, operator: Operator) -> Self {
        Self { a, b, operator }
    }

    /// Builds a problem from untrusted operands, such as a stored payload.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::NonPositiveOperand` unless both operands are at
    /// least 1, the range the generator draws from.
    pub fn try_new(a: i64, b: i64, operator: Operator) -> Result<Self, ProblemError> {
        if a < 1 || b < 1 {
            return Err(ProblemError::NonPositiveOperand { a, b });
        }
        Ok(Self::new(a, b, operator))
    }

    /// Unrounded result of the operation.
    #[must_use]
    pub fn evaluate(&self) -> f64 {
        self.operator.apply(self.a, self.b)
    }

    /// Text form used in the trace, e.g. `"12 ÷ 4"`.
    #[must_use]
    pub fn question_text(&self) -> String {
        format!("{} {} {}", self.a, self.operator.symbol(), self.b)
    }

    /// Natural-language form handed to the narrator, e.g. `"What is 7 plus 5?"`.
    #[must_use]
    pub fn spoken_text(&self) -> String {
        format!("What is {} {} {}?", self.a, self.operator.spoken(), self.b)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.a, self.operator, self.b)
    }
}
