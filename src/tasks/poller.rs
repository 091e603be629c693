use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::api::Backend;
use crate::config::Config;
use crate::types::{TaskKind, TaskSnapshot, TaskStatus};

/// Shared stop flag for one poll loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// `setTimeout`-backed timer for the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub tick: Duration,
    pub retry: Duration,
}

impl From<&Config> for PollIntervals {
    fn from(config: &Config) -> Self {
        Self {
            tick: config.poll_interval,
            retry: config.retry_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Snapshot(TaskSnapshot),
    /// Replaces the terminal panel wholesale.
    Terminal(Vec<String>),
    /// Emitted once, after the last snapshot, with its status.
    Finished(TaskStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Finished(TaskStatus),
    Cancelled,
}

/// Polls one task until it reaches a terminal status or `cancel` fires.
///
/// A failed status request emits nothing and is retried after
/// `intervals.retry`. A failed terminal request is skipped for that tick.
/// Once cancelled, no further requests are made and no events emitted.
pub async fn poll_task<B, T>(
    backend: &B,
    timer: &T,
    intervals: PollIntervals,
    kind: TaskKind,
    task_id: &str,
    cancel: &CancelToken,
    mut emit: impl FnMut(PollEvent),
) -> PollOutcome
where
    B: Backend,
    T: Timer,
{
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(task_id, "poller cancelled");
            return PollOutcome::Cancelled;
        }

        let snapshot = match backend.task_status(kind, task_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(task_id, %err, "status request failed; retrying");
                timer.sleep(intervals.retry).await;
                continue;
            }
        };
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        let status = snapshot.status.clone();
        tracing::debug!(task_id, status = status.as_str(), "poll tick");
        emit(PollEvent::Snapshot(snapshot));

        match backend.terminal_output(task_id).await {
            Ok(lines) if !cancel.is_cancelled() => emit(PollEvent::Terminal(lines)),
            Ok(_) => return PollOutcome::Cancelled,
            Err(err) => tracing::warn!(task_id, %err, "terminal output unavailable"),
        }

        if status.is_active() {
            timer.sleep(intervals.tick).await;
            continue;
        }

        tracing::info!(task_id, status = status.as_str(), "task finished");
        emit(PollEvent::Finished(status.clone()));
        return PollOutcome::Finished(status);
    }
}
