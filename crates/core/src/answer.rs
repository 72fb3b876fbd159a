use crate::model::{Operator, Problem};

/// Rounds to two decimal places, half away from zero.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Outcome of comparing a raw answer against a problem.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    /// Expected result; rounded to hundredths for division.
    pub correct_answer: f64,
    /// Parsed learner value, `None` when the input is not a finite number.
    pub parsed: Option<f64>,
    pub is_correct: bool,
}

impl AnswerCheck {
    /// Message shown to the learner after submitting.
    #[must_use]
    pub fn feedback(&self) -> String {
        if self.is_correct {
            "✅ Correct!".to_owned()
        } else {
            format!("❌ Incorrect. The answer is {}", self.correct_answer)
        }
    }
}

/// Checks `raw` against `problem`.
///
/// Division compares both sides after rounding to hundredths; every other
/// operator compares exactly. Input that does not parse is simply wrong.
#[must_use]
pub fn check_answer(problem: &Problem, raw: &str) -> AnswerCheck {
    let is_division = problem.operator == Operator::Divide;

    let mut correct_answer = problem.evaluate();
    let mut parsed = parse_number(raw);
    if is_division {
        correct_answer = round_to_hundredths(correct_answer);
        parsed = parsed.map(round_to_hundredths);
    }

    AnswerCheck {
        correct_answer,
        parsed,
        is_correct: parsed == Some(correct_answer),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_compares_at_two_decimals() {
        let problem = Problem::new(15, 4, Operator::Divide);

        let check = check_answer(&problem, "3.75");
        assert_eq!(check.correct_answer, 3.75);
        assert!(check.is_correct);

        let check = check_answer(&problem, "3.8");
        assert!(!check.is_correct);
        assert_eq!(check.feedback(), "❌ Incorrect. The answer is 3.75");

        assert!(check_answer(&problem, "3.749").is_correct);
    }

    #[test]
    fn repeating_quotient_rounds_both_sides() {
        let problem = Problem::new(10, 3, Operator::Divide);
        let check = check_answer(&problem, "3.33");
        assert_eq!(check.correct_answer, 3.33);
        assert!(check.is_correct);
        assert!(check_answer(&problem, "3.3333").is_correct);
    }

    #[test]
    fn non_division_compares_exactly() {
        let problem = Problem::new(7, 5, Operator::Add);
        assert!(check_answer(&problem, "12").is_correct);
        assert!(check_answer(&problem, " 12 ").is_correct);
        assert!(check_answer(&problem, "12.0").is_correct);
        assert!(!check_answer(&problem, "12.001").is_correct);
        assert_eq!(check_answer(&problem, "12").feedback(), "✅ Correct!");

        let problem = Problem::new(3, 9, Operator::Subtract);
        assert!(check_answer(&problem, "-6").is_correct);
    }

    #[test]
    fn unparsable_input_is_incorrect() {
        let problem = Problem::new(2, 2, Operator::Multiply);
        for raw in ["", "   ", "four", "4a", "NaN", "inf"] {
            let check = check_answer(&problem, raw);
            assert_eq!(check.parsed, None, "input {raw:?}");
            assert!(!check.is_correct);
        }
        assert_eq!(
            check_answer(&problem, "x").feedback(),
            "❌ Incorrect. The answer is 4"
        );
    }
}
