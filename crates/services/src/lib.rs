#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod narration;
pub mod persistence;
pub mod sessions;
pub mod timer;

pub use sessions as session;

pub use app_services::AppServices;
pub use error::AppServicesError;
pub use narration::{NARRATION_UNAVAILABLE_NOTICE, Narrator, UnavailableNarrator};
pub use persistence::{PersistenceLayer, SESSION_SLOT_KEY};
pub use sessions::{
    AdvanceTicket, Feedback, SessionConfig, SessionEngine, SessionEvent, SessionRuntime,
    SubmitOutcome,
};
pub use timer::{DelayedTask, Tick, Ticker, TimerService};
