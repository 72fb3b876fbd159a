use std::fmt::Write as _;

use drill_core::model::TraceEntry;
use services::SessionEngine;

pub const HELP: &str = "\
Commands:
  start          start a new session (clears the trace)
  next           next problem (only outside a session)
  speech on|off  read problems aloud
  trace          show the question trace
  status         show timers and progress
  quit           exit
Anything else is submitted as your answer.";

/// `m:ss` rendering of the session clock.
#[must_use]
pub fn format_session_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[must_use]
pub fn render_status(engine: &SessionEngine) -> String {
    let state = engine.state();
    if !state.active {
        return "No session running. Type `start` to begin.".to_owned();
    }
    format!(
        "⏱️ Session: {} | ⏲️ Question: {}s\nSession: Question {} | Difficulty: {}x",
        format_session_clock(state.session_elapsed_seconds),
        engine.question_elapsed_seconds(),
        state.questions_answered + 1,
        state.difficulty,
    )
}

/// The problem line. Hidden while narration reads it aloud.
#[must_use]
pub fn render_problem(engine: &SessionEngine) -> String {
    if engine.state().narration_enabled {
        "🔊 Listen and answer".to_owned()
    } else {
        format!("{} = ?", engine.current_problem())
    }
}

fn render_entry(out: &mut String, entry: &TraceEntry) {
    let mark = if entry.is_correct { "✅" } else { "❌" };
    let _ = writeln!(
        out,
        "{} ({})\n  Answer: {} {}  Time: {}s",
        entry.question_text, entry.operator_name, entry.user_answer, mark, entry.elapsed_seconds,
    );
}

/// Trace in review order, followed by totals.
#[must_use]
pub fn render_trace(engine: &SessionEngine) -> String {
    let mut out = String::from("Question Trace\n");
    let entries = engine.display_trace();
    if entries.is_empty() {
        out.push_str("No questions yet.");
        return out;
    }
    for entry in entries {
        render_entry(&mut out, entry);
    }
    let summary = engine.trace_summary();
    let _ = write!(
        out,
        "{} answered: {} correct, {} incorrect",
        summary.total, summary.correct, summary.incorrect
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{Operator, Problem, SessionSnapshot, SessionState, Trace};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine_with(trace: Trace, active: bool) -> SessionEngine {
        let mut state = SessionState::idle(Problem::new(7, 5, Operator::Add));
        state.active = active;
        state.session_elapsed_seconds = 125;
        SessionEngine::restore(
            Some(SessionSnapshot::capture(&state, &trace)),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn session_clock_pads_seconds() {
        assert_eq!(format_session_clock(0), "0:00");
        assert_eq!(format_session_clock(65), "1:05");
        assert_eq!(format_session_clock(600), "10:00");
    }

    #[test]
    fn status_shows_clock_question_and_difficulty() {
        let status = render_status(&engine_with(Trace::new(), true));
        assert!(status.contains("2:05"));
        assert!(status.contains("Question 1 | Difficulty: 1x"));

        let idle = render_status(&engine_with(Trace::new(), false));
        assert!(idle.contains("start"));
    }

    #[test]
    fn problem_is_hidden_while_narrating() {
        let mut engine = engine_with(Trace::new(), true);
        assert_eq!(render_problem(&engine), "7 + 5 = ?");
        engine.set_narration_enabled(true);
        assert_eq!(render_problem(&engine), "🔊 Listen and answer");
    }

    #[test]
    fn trace_lists_mistakes_first() {
        let problem = Problem::new(7, 5, Operator::Add);
        let trace = Trace::from_entries(vec![
            drill_core::model::TraceEntry::new(&problem, "12", 12.0, true, 9),
            drill_core::model::TraceEntry::new(&problem, "13", 12.0, false, 2),
        ]);
        let rendered = render_trace(&engine_with(trace, true));

        let wrong = rendered.find("Answer: 13").unwrap();
        let right = rendered.find("Answer: 12").unwrap();
        assert!(wrong < right);
        assert!(rendered.ends_with("2 answered: 1 correct, 1 incorrect"));
    }

    #[test]
    fn empty_trace_says_so() {
        let rendered = render_trace(&engine_with(Trace::new(), false));
        assert!(rendered.ends_with("No questions yet."));
    }
}
