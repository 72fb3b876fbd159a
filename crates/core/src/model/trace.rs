use crate::model::{Operator, Problem};

//
// ─── TRACE ENTRY ──────────────────────────────────────────────────────────────
//

/// Record of one answered problem within an active session.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub question_text: String,
    pub operator_name: String,
    pub a: i64,
    pub b: i64,
    pub operator: Operator,
    /// Exactly what the learner typed.
    pub user_answer: String,
    pub correct_answer: f64,
    pub is_correct: bool,
    pub elapsed_seconds: u32,
}

impl TraceEntry {
    #[must_use]
    pub fn new(
        problem: &Problem,
        user_answer: impl Into<String>,
        correct_answer: f64,
        is_correct: bool,
        elapsed_seconds: u32,
    ) -> Self {
        Self {
            question_text: problem.question_text(),
            operator_name: problem.operator.name().to_owned(),
            a: problem.a,
            b: problem.b,
            operator: problem.operator,
            user_answer: user_answer.into(),
            correct_answer,
            is_correct,
            elapsed_seconds,
        }
    }
}

//
// ─── TRACE ────────────────────────────────────────────────────────────────────
//

/// Counts derived from a trace, for end-of-session review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub total_seconds: u64,
}

/// Append-only, chronological log of answered problems.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: Vec<TraceEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    /// Drops every entry. Only a new session start does this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in the order they were answered.
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Review ordering: mistakes first, slowest first within each group.
    ///
    /// Computed on every call; the chronological order is left untouched.
    #[must_use]
    pub fn display_order(&self) -> Vec<&TraceEntry> {
        let mut ordered: Vec<&TraceEntry> = self.entries.iter().collect();
        ordered.sort_by(|lhs, rhs| {
            lhs.is_correct
                .cmp(&rhs.is_correct)
                .then_with(|| rhs.elapsed_seconds.cmp(&lhs.elapsed_seconds))
        });
        ordered
    }

    #[must_use]
    pub fn summary(&self) -> TraceSummary {
        let correct = self.entries.iter().filter(|e| e.is_correct).count();
        TraceSummary {
            total: self.entries.len(),
            correct,
            incorrect: self.entries.len() - correct,
            total_seconds: self
                .entries
                .iter()
                .map(|e| u64::from(e.elapsed_seconds))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(is_correct: bool, elapsed_seconds: u32) -> TraceEntry {
        let problem = Problem::new(2, 3, Operator::Add);
        TraceEntry::new(&problem, "5", 5.0, is_correct, elapsed_seconds)
    }

    #[test]
    fn display_order_puts_slow_mistakes_first() {
        let trace = Trace::from_entries(vec![entry(false, 2), entry(true, 10), entry(false, 7)]);

        let ordered: Vec<(bool, u32)> = trace
            .display_order()
            .into_iter()
            .map(|e| (e.is_correct, e.elapsed_seconds))
            .collect();
        assert_eq!(ordered, vec![(false, 7), (false, 2), (true, 10)]);

        // chronological order is preserved
        assert_eq!(trace.entries()[0].elapsed_seconds, 2);
        assert_eq!(trace.entries()[2].elapsed_seconds, 7);
    }

    #[test]
    fn display_order_is_stable_for_ties() {
        let mut first = entry(true, 4);
        first.user_answer = "first".into();
        let mut second = entry(true, 4);
        second.user_answer = "second".into();
        let trace = Trace::from_entries(vec![first, second]);

        let answers: Vec<&str> = trace
            .display_order()
            .into_iter()
            .map(|e| e.user_answer.as_str())
            .collect();
        assert_eq!(answers, vec!["first", "second"]);
    }

    #[test]
    fn entry_captures_problem_details() {
        let problem = Problem::new(15, 4, Operator::Divide);
        let entry = TraceEntry::new(&problem, "3.8", 3.75, false, 9);
        assert_eq!(entry.question_text, "15 ÷ 4");
        assert_eq!(entry.operator_name, "Division");
        assert_eq!(entry.operator, Operator::Divide);
        assert_eq!(entry.user_answer, "3.8");
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut trace = Trace::new();
        trace.append(entry(true, 3));
        trace.append(entry(false, 5));
        trace.append(entry(true, 1));

        let summary = trace.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.total_seconds, 9);

        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.summary(), TraceSummary::default());
    }
}
