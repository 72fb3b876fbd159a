use std::fmt;

use drill_core::model::{
    Difficulty, Problem, SessionSnapshot, SessionState, Trace, TraceEntry, TraceSummary,
};
use drill_core::{AnswerCheck, check_answer, generate, generate_default};
use rand::SeedableRng;
use rand::rngs::StdRng;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Permission to advance past an answered problem once the feedback delay
/// has elapsed. Only the most recently issued ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    epoch: u64,
    problem_seq: u64,
}

/// Feedback currently shown for the last submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub user_answer: String,
    pub message: String,
    pub is_correct: bool,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub check: AnswerCheck,
    /// True when a trace entry was appended (active sessions only).
    pub recorded: bool,
    /// Present when the engine expects `complete_feedback` after the delay.
    pub advance: Option<AdvanceTicket>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Session state machine: Idle until `start`, then Active for good.
///
/// Owns the session state and trace. Time-driven changes arrive as tagged
/// calls (`tick_session`, `tick_question`, `complete_feedback`) so anything
/// scheduled for a superseded session or problem is rejected.
pub struct SessionEngine {
    state: SessionState,
    trace: Trace,
    question_elapsed_seconds: u32,
    feedback: Option<Feedback>,
    pending_advance: Option<AdvanceTicket>,
    epoch: u64,
    problem_seq: u64,
    rng: StdRng,
}

impl SessionEngine {
    /// Fresh idle engine with a default-difficulty placeholder problem.
    #[must_use]
    pub fn new(mut rng: StdRng) -> Self {
        let problem = generate_default(&mut rng);
        Self::from_parts(SessionState::idle(problem), Trace::new(), rng)
    }

    /// Engine resumed from a persisted snapshot, or fresh when there is none.
    #[must_use]
    pub fn restore(snapshot: Option<SessionSnapshot>, mut rng: StdRng) -> Self {
        match snapshot {
            Some(snapshot) => {
                let (state, trace) = snapshot.into_parts(|| generate_default(&mut rng));
                Self::from_parts(state, trace, rng)
            }
            None => Self::new(rng),
        }
    }

    /// Engine seeded from OS entropy.
    #[must_use]
    pub fn from_entropy(snapshot: Option<SessionSnapshot>) -> Self {
        Self::restore(snapshot, StdRng::from_os_rng())
    }

    fn from_parts(state: SessionState, trace: Trace, rng: StdRng) -> Self {
        Self {
            state,
            trace,
            question_elapsed_seconds: 0,
            feedback: None,
            pending_advance: None,
            epoch: 0,
            problem_seq: 0,
            rng,
        }
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Begin a new session, discarding all prior history.
    pub fn start(&mut self) {
        self.epoch += 1;
        self.pending_advance = None;
        self.feedback = None;
        self.trace.clear();
        self.state = SessionState {
            active: true,
            questions_answered: 0,
            difficulty: Difficulty::INITIAL,
            session_elapsed_seconds: 0,
            show_start_prompt: false,
            narration_enabled: false,
            current_problem: generate(Difficulty::INITIAL, &mut self.rng),
        };
        self.problem_changed();
        tracing::debug!(epoch = self.epoch, "session started");
    }

    /// Check `raw` against the current problem.
    ///
    /// Returns `None` while a previous answer is still waiting for its
    /// advance; the problem on screen has already been answered.
    pub fn submit_answer(&mut self, raw: &str) -> Option<SubmitOutcome> {
        if self.pending_advance.is_some() {
            return None;
        }

        let problem = self.state.current_problem;
        let check = check_answer(&problem, raw);
        self.feedback = Some(Feedback {
            user_answer: raw.to_owned(),
            message: check.feedback(),
            is_correct: check.is_correct,
        });

        if !self.state.active {
            return Some(SubmitOutcome {
                check,
                recorded: false,
                advance: None,
            });
        }

        self.trace.append(TraceEntry::new(
            &problem,
            raw,
            check.correct_answer,
            check.is_correct,
            self.question_elapsed_seconds,
        ));
        let ticket = AdvanceTicket {
            epoch: self.epoch,
            problem_seq: self.problem_seq,
        };
        self.pending_advance = Some(ticket);

        Some(SubmitOutcome {
            check,
            recorded: true,
            advance: Some(ticket),
        })
    }

    /// Redeem a ticket after the feedback delay. Stale tickets are ignored.
    pub fn complete_feedback(&mut self, ticket: AdvanceTicket) -> bool {
        if self.pending_advance != Some(ticket) {
            tracing::debug!(?ticket, "ignoring stale advance");
            return false;
        }
        self.advance();
        true
    }

    /// Manual next-problem request. Only honoured while idle.
    pub fn next_problem(&mut self) -> bool {
        if self.state.active {
            return false;
        }
        self.advance();
        true
    }

    /// One second of session time, if `epoch` is still the running session.
    pub fn tick_session(&mut self, epoch: u64) -> bool {
        if !self.state.active || epoch != self.epoch {
            return false;
        }
        self.state.session_elapsed_seconds = self.state.session_elapsed_seconds.saturating_add(1);
        true
    }

    /// One second on the current question, if `problem_seq` is still current.
    pub fn tick_question(&mut self, problem_seq: u64) -> bool {
        if !self.state.active || problem_seq != self.problem_seq {
            return false;
        }
        self.question_elapsed_seconds = self.question_elapsed_seconds.saturating_add(1);
        true
    }

    /// Toggle narration. Returns the text to speak when it was just switched on.
    pub fn set_narration_enabled(&mut self, enabled: bool) -> Option<String> {
        let freshly_enabled = enabled && !self.state.narration_enabled;
        self.state.narration_enabled = enabled;
        freshly_enabled.then(|| self.spoken_problem())
    }

    fn advance(&mut self) {
        if self.state.active {
            self.state.questions_answered += 1;
            if Difficulty::escalates_at(self.state.questions_answered) {
                self.state.difficulty = self.state.difficulty.escalated();
                tracing::info!(
                    answered = self.state.questions_answered,
                    difficulty = %self.state.difficulty,
                    "difficulty increased"
                );
            }
            self.state.current_problem = generate(self.state.difficulty, &mut self.rng);
        } else {
            self.state.current_problem = generate_default(&mut self.rng);
        }
        self.pending_advance = None;
        self.feedback = None;
        self.problem_changed();
    }

    fn problem_changed(&mut self) {
        self.problem_seq += 1;
        self.question_elapsed_seconds = 0;
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    #[must_use]
    pub fn current_problem(&self) -> &Problem {
        &self.state.current_problem
    }

    /// Narrator-ready rendering of the current problem.
    #[must_use]
    pub fn spoken_problem(&self) -> String {
        self.state.current_problem.spoken_text()
    }

    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Trace in review order: mistakes first, slowest first.
    #[must_use]
    pub fn display_trace(&self) -> Vec<&TraceEntry> {
        self.trace.display_order()
    }

    #[must_use]
    pub fn trace_summary(&self) -> TraceSummary {
        self.trace.summary()
    }

    #[must_use]
    pub fn question_elapsed_seconds(&self) -> u32 {
        self.question_elapsed_seconds
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending_advance
    }

    /// Increments on every `start`.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Increments every time the current problem is replaced.
    #[must_use]
    pub fn problem_seq(&self) -> u64 {
        self.problem_seq
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state, &self.trace)
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("state", &self.state)
            .field("trace_len", &self.trace.len())
            .field("question_elapsed_seconds", &self.question_elapsed_seconds)
            .field("pending_advance", &self.pending_advance)
            .field("epoch", &self.epoch)
            .field("problem_seq", &self.problem_seq)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
