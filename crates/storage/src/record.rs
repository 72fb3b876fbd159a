//! JSON wire shape of a persisted session snapshot.
//!
//! Field names follow the stored payload (`sessionActive`, `showStart`, ...),
//! not the domain names. Every field is optional on read so payloads written
//! by older builds still load; a missing `showStart` means the prompt is shown.

use drill_core::model::{
    Difficulty, Operator, Problem, SessionSnapshot, Trace, TraceEntry,
};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub a: i64,
    pub b: i64,
    pub op: OperatorRecord,
}

impl ProblemRecord {
    fn from_problem(problem: &Problem) -> Self {
        Self {
            a: problem.a,
            b: problem.b,
            op: OperatorRecord {
                symbol: problem.operator.symbol().to_owned(),
            },
        }
    }

    fn into_problem(self) -> Result<Problem, drill_core::Error> {
        let operator = Operator::from_symbol(&self.op.symbol)?;
        Ok(Problem::try_new(self.a, self.b, operator)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntryRecord {
    #[serde(alias = "question")]
    pub question_text: String,
    #[serde(alias = "operation")]
    pub operator_name: String,
    pub a: i64,
    pub b: i64,
    pub operator: String,
    pub user_answer: String,
    #[serde(alias = "correct")]
    pub correct_answer: f64,
    pub is_correct: bool,
    #[serde(alias = "time")]
    pub elapsed_seconds_for_question: u32,
}

impl TraceEntryRecord {
    fn from_entry(entry: &TraceEntry) -> Self {
        Self {
            question_text: entry.question_text.clone(),
            operator_name: entry.operator_name.clone(),
            a: entry.a,
            b: entry.b,
            operator: entry.operator.symbol().to_owned(),
            user_answer: entry.user_answer.clone(),
            correct_answer: entry.correct_answer,
            is_correct: entry.is_correct,
            elapsed_seconds_for_question: entry.elapsed_seconds,
        }
    }

    fn into_entry(self) -> Result<TraceEntry, drill_core::Error> {
        Ok(TraceEntry {
            question_text: self.question_text,
            operator_name: self.operator_name,
            a: self.a,
            b: self.b,
            operator: Operator::from_symbol(&self.operator)?,
            user_answer: self.user_answer,
            correct_answer: self.correct_answer,
            is_correct: self.is_correct,
            elapsed_seconds: self.elapsed_seconds_for_question,
        })
    }
}

/// Persisted shape of a `SessionSnapshot`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    #[serde(default)]
    pub trace: Option<Vec<TraceEntryRecord>>,
    #[serde(default)]
    pub session_active: Option<bool>,
    #[serde(default)]
    pub questions_answered: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub show_start: Option<bool>,
    #[serde(default)]
    pub session_timer: Option<u32>,
    #[serde(default)]
    pub problem: Option<ProblemRecord>,
    #[serde(default)]
    pub speech_mode: Option<bool>,
}

impl SnapshotRecord {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            trace: Some(
                snapshot
                    .trace
                    .entries()
                    .iter()
                    .map(TraceEntryRecord::from_entry)
                    .collect(),
            ),
            session_active: Some(snapshot.active),
            questions_answered: Some(snapshot.questions_answered),
            difficulty: Some(snapshot.difficulty.value()),
            show_start: Some(snapshot.show_start_prompt),
            session_timer: Some(snapshot.session_elapsed_seconds),
            problem: snapshot.current_problem.as_ref().map(ProblemRecord::from_problem),
            speech_mode: Some(snapshot.narration_enabled),
        }
    }

    /// Convert the record back into a domain snapshot, applying defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unknown operator symbols,
    /// non-positive problem operands or a negative/non-finite difficulty.
    pub fn into_snapshot(self) -> Result<SessionSnapshot, StorageError> {
        // A zero difficulty is treated like a missing one.
        let difficulty = match self.difficulty {
            None => Difficulty::INITIAL,
            Some(value) if value == 0.0 => Difficulty::INITIAL,
            Some(value) => Difficulty::new(value).map_err(drill_core::Error::from)?,
        };

        let entries = self
            .trace
            .unwrap_or_default()
            .into_iter()
            .map(TraceEntryRecord::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SessionSnapshot {
            active: self.session_active.unwrap_or(false),
            questions_answered: self.questions_answered.unwrap_or(0),
            difficulty,
            session_elapsed_seconds: self.session_timer.unwrap_or(0),
            show_start_prompt: self.show_start.unwrap_or(true),
            narration_enabled: self.speech_mode.unwrap_or(false),
            current_problem: self.problem.map(ProblemRecord::into_problem).transpose()?,
            trace: Trace::from_entries(entries),
        })
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the payload is not a valid snapshot.
    pub fn decode(payload: &str) -> Result<SessionSnapshot, StorageError> {
        serde_json::from_str::<Self>(payload)
            .map_err(ser)?
            .into_snapshot()
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if JSON encoding fails.
    pub fn encode(snapshot: &SessionSnapshot) -> Result<String, StorageError> {
        serde_json::to_string(&Self::from_snapshot(snapshot)).map_err(ser)
    }
}
