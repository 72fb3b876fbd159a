mod difficulty;
mod operator;
mod problem;
mod session;
mod trace;

pub use difficulty::{Difficulty, DifficultyError};
pub use operator::{Operator, OperatorError};
pub use problem::{Problem, ProblemError};
pub use session::{SessionSnapshot, SessionState};
pub use trace::{Trace, TraceEntry, TraceSummary};
