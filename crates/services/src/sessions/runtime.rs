use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::mpsc;

use crate::narration::{NARRATION_UNAVAILABLE_NOTICE, Narrator};
use crate::persistence::PersistenceLayer;
use crate::timer::{DelayedTask, Tick, TimerService};

use super::engine::{AdvanceTicket, SessionEngine, SubmitOutcome};

/// Timing knobs for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Period of both the session and the question clock.
    pub tick_period: Duration,
    /// How long feedback stays up before an active session advances.
    pub feedback_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            feedback_delay: Duration::from_secs(1),
        }
    }
}

/// Scheduled work delivered back to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick(Tick),
    FeedbackElapsed(AdvanceTicket),
}

/// Drives a `SessionEngine` from host commands and scheduled events.
///
/// Every operation runs to completion, including its snapshot write, before
/// the next one is processed. Scheduled callbacks only post `SessionEvent`s;
/// the host pulls them with `next_event` and applies them with `handle_event`.
pub struct SessionRuntime {
    config: SessionConfig,
    engine: SessionEngine,
    persistence: PersistenceLayer,
    narrator: Arc<dyn Narrator>,
    timers: TimerService,
    feedback_task: DelayedTask,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionRuntime {
    /// Load the persisted snapshot once and resume from it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn boot(
        config: SessionConfig,
        persistence: PersistenceLayer,
        narrator: Arc<dyn Narrator>,
        rng: StdRng,
    ) -> Self {
        let snapshot = persistence.load().await;
        let resumed = snapshot.is_some();
        let engine = SessionEngine::restore(snapshot, rng);
        tracing::info!(
            resumed,
            active = engine.is_active(),
            answered = engine.state().questions_answered,
            "session runtime booted"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut runtime = Self {
            timers: TimerService::new(config.tick_period),
            config,
            engine,
            persistence,
            narrator,
            feedback_task: DelayedTask::new(),
            events_tx,
            events_rx,
        };

        if !runtime.narrator.is_available() {
            tracing::warn!("narration unavailable on this host");
        }
        runtime.sync_timers();
        if runtime.engine.state().narration_enabled {
            runtime.speak_current_problem();
        }
        runtime.persist().await;
        runtime
    }

    #[must_use]
    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Notice to show the learner when narration cannot work on this host.
    #[must_use]
    pub fn narration_notice(&self) -> Option<&'static str> {
        (!self.narrator.is_available()).then_some(NARRATION_UNAVAILABLE_NOTICE)
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Start a fresh session, cancelling anything scheduled for the old one.
    pub async fn start(&mut self) {
        self.feedback_task.cancel();
        let before = self.engine.problem_seq();
        self.engine.start();
        self.after_change(before).await;
    }

    /// Submit a raw answer. `None` if an earlier answer is still pending.
    pub async fn submit_answer(&mut self, raw: &str) -> Option<SubmitOutcome> {
        let outcome = self.engine.submit_answer(raw)?;
        self.persist().await;

        if let Some(ticket) = outcome.advance {
            let tx = self.events_tx.clone();
            self.feedback_task.schedule(self.config.feedback_delay, move || {
                // receiver lives as long as the runtime
                let _ = tx.send(SessionEvent::FeedbackElapsed(ticket));
            });
        }
        Some(outcome)
    }

    /// Manual next problem while idle.
    pub async fn next_problem(&mut self) -> bool {
        let before = self.engine.problem_seq();
        if !self.engine.next_problem() {
            return false;
        }
        self.after_change(before).await;
        true
    }

    pub async fn set_narration_enabled(&mut self, enabled: bool) {
        if let Some(text) = self.engine.set_narration_enabled(enabled) {
            self.speak(&text);
        }
        self.persist().await;
    }

    //
    // ─── EVENTS ────────────────────────────────────────────────────────────────
    //

    /// Wait for the next scheduled event.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Apply a scheduled event. Returns false when it was stale.
    pub async fn handle_event(&mut self, event: SessionEvent) -> bool {
        let before = self.engine.problem_seq();
        let applied = match event {
            SessionEvent::Tick(Tick::Session { epoch }) => self.engine.tick_session(epoch),
            SessionEvent::Tick(Tick::Question { problem_seq }) => {
                self.engine.tick_question(problem_seq)
            }
            SessionEvent::FeedbackElapsed(ticket) => self.engine.complete_feedback(ticket),
        };
        if applied {
            self.after_change(before).await;
        }
        applied
    }

    /// Stop every scheduled callback.
    pub fn shutdown(&mut self) {
        self.timers.stop();
        self.feedback_task.cancel();
    }

    async fn after_change(&mut self, problem_seq_before: u64) {
        self.sync_timers();
        if self.engine.problem_seq() != problem_seq_before && self.engine.state().narration_enabled
        {
            self.speak_current_problem();
        }
        self.persist().await;
    }

    fn sync_timers(&mut self) {
        let tx = self.events_tx.clone();
        self.timers.sync(
            self.engine.is_active(),
            self.engine.epoch(),
            self.engine.problem_seq(),
            move |tick| tx.send(SessionEvent::Tick(tick)).is_ok(),
        );
    }

    fn speak_current_problem(&self) {
        self.speak(&self.engine.spoken_problem());
    }

    fn speak(&self, text: &str) {
        if self.narrator.is_available() {
            self.narrator.speak(text);
        } else {
            tracing::debug!(text, "narration skipped");
        }
    }

    async fn persist(&self) {
        self.persistence.save(&self.engine.snapshot()).await;
    }
}

impl fmt::Debug for SessionRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRuntime")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("timers", &self.timers)
            .field("feedback_pending", &self.feedback_task.is_pending())
            .finish_non_exhaustive()
    }
}
