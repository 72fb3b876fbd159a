use rand::Rng;

use crate::model::{Difficulty, Operator, Problem};

/// Draws a new problem scaled by `difficulty`.
///
/// Both operands are drawn independently from `1..=floor(20 * difficulty)`.
/// For division the dividend is `x * y` so the quotient is always whole.
pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Problem {
    let ceiling = difficulty.operand_ceiling();
    let operator = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
    let x = rng.random_range(1..=ceiling);
    let y = rng.random_range(1..=ceiling);

    match operator {
        Operator::Divide => Problem::new(x * y, y, operator),
        _ => Problem::new(x, y, operator),
    }
}

/// Placeholder problem for the idle screen.
pub fn generate_default<R: Rng + ?Sized>(rng: &mut R) -> Problem {
    generate(Difficulty::INITIAL, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn operands_stay_within_ceiling() {
        let mut rng = StdRng::seed_from_u64(7);
        for value in [0.5, 1.0, 1.3, 1.69, 4.83] {
            let difficulty = Difficulty::new(value).unwrap();
            let ceiling = difficulty.operand_ceiling();
            for _ in 0..500 {
                let problem = generate(difficulty, &mut rng);
                assert!((1..=ceiling).contains(&problem.b));
                if problem.operator == Operator::Divide {
                    assert_eq!(problem.a % problem.b, 0);
                    let quotient = problem.a / problem.b;
                    assert!((1..=ceiling).contains(&quotient));
                    assert_eq!(problem.evaluate().fract(), 0.0);
                } else {
                    assert!((1..=ceiling).contains(&problem.a));
                }
            }
        }
    }

    #[test]
    fn division_at_escalated_difficulty_stays_whole() {
        let mut difficulty = Difficulty::INITIAL;
        for _ in 0..100 {
            difficulty = difficulty.escalated();
        }
        let ceiling = difficulty.operand_ceiling();
        let mut rng = StdRng::seed_from_u64(1600);
        let mut divisions = 0;
        while divisions < 200 {
            let problem = generate(difficulty, &mut rng);
            assert!(problem.a > 0 && problem.b > 0);
            if problem.operator == Operator::Divide {
                divisions += 1;
                assert!((1..=ceiling).contains(&problem.b));
                assert_eq!(problem.a % problem.b, 0);
                assert!((1..=ceiling).contains(&(problem.a / problem.b)));
            }
        }
    }

    #[test]
    fn draws_every_operator() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<Operator> = (0..400)
            .map(|_| generate_default(&mut rng).operator)
            .collect();
        assert_eq!(seen.len(), Operator::ALL.len());
    }

    #[test]
    fn same_seed_same_problem() {
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        assert_eq!(
            generate(Difficulty::INITIAL, &mut first),
            generate(Difficulty::INITIAL, &mut second)
        );
    }
}
