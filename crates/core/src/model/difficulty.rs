use std::fmt;

use thiserror::Error;

use crate::answer::round_to_hundredths;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DifficultyError {
    #[error("difficulty must be a positive finite number, got {0}")]
    NotPositive(f64),
}

/// Scale factor for generated operands.
///
/// Starts at 1.0 and only ever grows, by `ESCALATION_FACTOR` rounded to two
/// decimals, once every `QUESTIONS_PER_LEVEL` answered questions.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Difficulty(f64);

impl Difficulty {
    pub const INITIAL: Difficulty = Difficulty(1.0);
    pub const ESCALATION_FACTOR: f64 = 1.3;
    pub const QUESTIONS_PER_LEVEL: u32 = 20;
    /// Operand ceiling at difficulty 1.0.
    pub const BASE_OPERAND_CEILING: f64 = 20.0;
    /// Largest ceiling whose square still fits in an `i64`, so a division
    /// dividend `x * y` never overflows.
    pub const MAX_OPERAND_CEILING: i64 = 3_037_000_499;

    /// # Errors
    ///
    /// Returns `DifficultyError::NotPositive` for zero, negative or non-finite values.
    pub fn new(value: f64) -> Result<Self, DifficultyError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(DifficultyError::NotPositive(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Next difficulty level: `round(self * 1.3, 2)`.
    ///
    /// Stays put once the product is no longer finite.
    #[must_use]
    pub fn escalated(self) -> Self {
        let next = round_to_hundredths(self.0 * Self::ESCALATION_FACTOR);
        if next.is_finite() { Self(next) } else { self }
    }

    /// Returns true when answering the `answered`-th question moves to the next level.
    #[must_use]
    pub fn escalates_at(answered: u32) -> bool {
        answered > 0 && answered % Self::QUESTIONS_PER_LEVEL == 0
    }

    /// Largest operand the generator may draw, `floor(20 * difficulty)`,
    /// clamped to `1..=MAX_OPERAND_CEILING`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn operand_ceiling(self) -> i64 {
        ((Self::BASE_OPERAND_CEILING * self.0).floor() as i64).clamp(1, Self::MAX_OPERAND_CEILING)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
