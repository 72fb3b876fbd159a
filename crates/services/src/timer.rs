//! Cancellable scheduling primitives backed by tokio tasks.
//!
//! Callbacks never touch session state directly; they post tagged events
//! which the runtime validates before applying.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

//
// ─── TICKER ────────────────────────────────────────────────────────────────────
//

/// Recurring callback with a fixed period.
///
/// The first tick fires one full period after `start_ticking`. `stop` is
/// idempotent, and starting again replaces the previous task.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Begin ticking. `on_tick` returns `false` to end the stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_ticking<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

//
// ─── DELAYED TASK ──────────────────────────────────────────────────────────────
//

/// One-shot callback after a delay. Scheduling again cancels the pending one.
#[derive(Debug, Default)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            task();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

//
// ─── TIMER SERVICE ─────────────────────────────────────────────────────────────
//

/// Which stream a tick belongs to, tagged with what it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Session clock tick for the given session epoch.
    Session { epoch: u64 },
    /// Question clock tick for the given problem sequence number.
    Question { problem_seq: u64 },
}

/// The session and question clocks, gated by session activity.
///
/// `sync` reconciles both tickers with the engine: the session ticker runs
/// while active and restarts when the epoch changes; the question ticker runs
/// while active and restarts whenever the problem changes.
#[derive(Debug)]
pub struct TimerService {
    session: Ticker,
    question: Ticker,
    session_epoch: Option<u64>,
    question_seq: Option<u64>,
}

impl TimerService {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            session: Ticker::new(period),
            question: Ticker::new(period),
            session_epoch: None,
            question_seq: None,
        }
    }

    /// Bring both tickers in line with the session. `emit` posts a tick and
    /// returns `false` once nobody is listening.
    pub fn sync<E>(&mut self, active: bool, epoch: u64, problem_seq: u64, emit: E)
    where
        E: Fn(Tick) -> bool + Clone + Send + 'static,
    {
        if !active {
            self.stop();
            return;
        }

        if self.session_epoch != Some(epoch) || !self.session.is_running() {
            let emit = emit.clone();
            self.session
                .start_ticking(move || emit(Tick::Session { epoch }));
            self.session_epoch = Some(epoch);
        }

        if self.question_seq != Some(problem_seq) || !self.question.is_running() {
            self.question
                .start_ticking(move || emit(Tick::Question { problem_seq }));
            self.question_seq = Some(problem_seq);
        }
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.question.stop();
        self.session_epoch = None;
        self.question_seq = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.is_running() || self.question.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticker_fires_once_per_period() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let seen = Arc::clone(&count);
        ticker.start_ticking(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        });

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        ticker.stop();
        ticker.stop();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_does_not_duplicate_streams() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new(Duration::from_secs(1));
        for _ in 0..5 {
            let seen = Arc::clone(&count);
            ticker.start_ticking(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                true
            });
        }

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_task_can_be_cancelled() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut task = DelayedTask::new();

        let seen = Arc::clone(&fired);
        task.schedule(Duration::from_secs(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert!(task.is_pending());
        task.cancel();
        assert!(!task.is_pending());

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let seen = Arc::clone(&fired);
        task.schedule(Duration::from_secs(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_service_is_gated_and_tagged() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emit = move |tick: Tick| tx.send(tick).is_ok();
        let mut timers = TimerService::new(Duration::from_secs(1));

        timers.sync(false, 1, 1, emit.clone());
        assert!(!timers.is_running());

        timers.sync(true, 1, 1, emit.clone());
        time::sleep(Duration::from_millis(1500)).await;
        let mut ticks = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        ticks.sort_by_key(|t| matches!(t, Tick::Question { .. }));
        assert_eq!(
            ticks,
            vec![Tick::Session { epoch: 1 }, Tick::Question { problem_seq: 1 }]
        );

        // a new problem restarts only the question clock
        timers.sync(true, 1, 2, emit.clone());
        time::sleep(Duration::from_secs(1)).await;
        let mut ticks = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        ticks.sort_by_key(|t| matches!(t, Tick::Question { .. }));
        assert_eq!(
            ticks,
            vec![Tick::Session { epoch: 1 }, Tick::Question { problem_seq: 2 }]
        );

        timers.sync(false, 1, 2, emit);
        assert!(!timers.is_running());
        time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }
}
