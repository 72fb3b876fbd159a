use std::fmt;

use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperatorError {
    #[error("unknown operator symbol: {0:?}")]
    UnknownSymbol(String),
}

//
// ─── OPERATOR ─────────────────────────────────────────────────────────────────
//

/// The four arithmetic operations a drill problem can use.
///
/// Evaluation is dispatched by tag; problems never carry code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in the order the generator draws from.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// Parses the display symbol back into an operator.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::UnknownSymbol` for anything but `+`, `-`, `×`, `÷`.
    pub fn from_symbol(symbol: &str) -> Result<Self, OperatorError> {
        match symbol {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "×" => Ok(Self::Multiply),
            "÷" => Ok(Self::Divide),
            other => Err(OperatorError::UnknownSymbol(other.to_owned())),
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Human-readable operation name shown next to trace entries.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "Addition",
            Operator::Subtract => "Subtraction",
            Operator::Multiply => "Multiplication",
            Operator::Divide => "Division",
        }
    }

    /// Word used when the problem is read aloud.
    #[must_use]
    pub fn spoken(self) -> &'static str {
        match self {
            Operator::Add => "plus",
            Operator::Subtract => "minus",
            Operator::Multiply => "times",
            Operator::Divide => "divided by",
        }
    }

    /// Evaluates `a <op> b` without any rounding.
    ///
    /// Division by zero follows IEEE semantics; generated problems never
    /// produce a zero divisor.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, a: i64, b: i64) -> f64 {
        let (a, b) = (a as f64, b as f64);
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
