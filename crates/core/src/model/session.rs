use crate::model::{Difficulty, Problem, Trace};

/// Observable state of the drill session, excluding the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub active: bool,
    pub questions_answered: u32,
    pub difficulty: Difficulty,
    pub session_elapsed_seconds: u32,
    pub show_start_prompt: bool,
    pub narration_enabled: bool,
    pub current_problem: Problem,
}

impl SessionState {
    /// Fresh state before any session was ever started.
    #[must_use]
    pub fn idle(current_problem: Problem) -> Self {
        Self {
            active: false,
            questions_answered: 0,
            difficulty: Difficulty::INITIAL,
            session_elapsed_seconds: 0,
            show_start_prompt: true,
            narration_enabled: false,
            current_problem,
        }
    }
}

/// Everything needed to resume a session after a restart.
///
/// `current_problem` is `None` only when a stored payload carried no problem;
/// snapshots taken from a running session always have one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub questions_answered: u32,
    pub difficulty: Difficulty,
    pub session_elapsed_seconds: u32,
    pub show_start_prompt: bool,
    pub narration_enabled: bool,
    pub current_problem: Option<Problem>,
    pub trace: Trace,
}

impl SessionSnapshot {
    #[must_use]
    pub fn capture(state: &SessionState, trace: &Trace) -> Self {
        Self {
            active: state.active,
            questions_answered: state.questions_answered,
            difficulty: state.difficulty,
            session_elapsed_seconds: state.session_elapsed_seconds,
            show_start_prompt: state.show_start_prompt,
            narration_enabled: state.narration_enabled,
            current_problem: Some(state.current_problem),
            trace: trace.clone(),
        }
    }

    /// Split into live state and trace, filling a missing problem with `fallback`.
    #[must_use]
    pub fn into_parts(self, fallback: impl FnOnce() -> Problem) -> (SessionState, Trace) {
        let state = SessionState {
            active: self.active,
            questions_answered: self.questions_answered,
            difficulty: self.difficulty,
            session_elapsed_seconds: self.session_elapsed_seconds,
            show_start_prompt: self.show_start_prompt,
            narration_enabled: self.narration_enabled,
            current_problem: self.current_problem.unwrap_or_else(fallback),
        };
        (state, self.trace)
    }
}
