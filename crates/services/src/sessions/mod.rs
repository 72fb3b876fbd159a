mod engine;
mod runtime;

// Public API of the session subsystem.
pub use engine::{AdvanceTicket, Feedback, SessionEngine, SubmitOutcome};
pub use runtime::{SessionConfig, SessionEvent, SessionRuntime};
