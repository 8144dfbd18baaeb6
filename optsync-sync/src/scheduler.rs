//! Single-shot deferred tasks.
//!
//! The engine only ever asks for "call me back once, later". Whoever owns the
//! event loop delivers the fired [`TaskToken`] to [`crate::reload::on_timer`].

use crate::error::{SyncError, SyncResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

impl TaskToken {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Deferred-task capability.
pub trait Scheduler: Send + Sync {
    /// Arranges for the returned token to be delivered once after `delay`.
    fn schedule_once(&self, delay: Duration) -> TaskToken;

    /// Prevents a scheduled token from being delivered.
    fn cancel(&self, token: TaskToken);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Manual ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualState {
    next: u64,
    pending: Vec<(TaskToken, Duration)>,
    scheduled: usize,
    cancelled: Vec<TaskToken>,
}

/// Scheduler driven by hand: tokens are only handed out by [`Self::take_due`].
///
/// Clones share state, so a test can keep one clone and give another to the
/// engine.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens scheduled and not yet taken or cancelled.
    pub fn pending(&self) -> Vec<TaskToken> {
        lock(&self.state).pending.iter().map(|(t, _)| *t).collect()
    }

    /// Total number of `schedule_once` calls.
    pub fn scheduled_count(&self) -> usize {
        lock(&self.state).scheduled
    }

    pub fn cancelled(&self) -> Vec<TaskToken> {
        lock(&self.state).cancelled.clone()
    }

    /// Removes and returns every pending token, oldest first, as if all
    /// their delays had elapsed.
    pub fn take_due(&self) -> Vec<TaskToken> {
        lock(&self.state)
            .pending
            .drain(..)
            .map(|(t, _)| t)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration) -> TaskToken {
        let mut state = lock(&self.state);
        state.next += 1;
        state.scheduled += 1;
        let token = TaskToken::new(state.next);
        state.pending.push((token, delay));
        trace!(%token, ?delay, "Scheduled manual task");
        token
    }

    fn cancel(&self, token: TaskToken) {
        let mut state = lock(&self.state);
        state.pending.retain(|(t, _)| *t != token);
        state.cancelled.push(token);
    }
}

// ── Tokio ─────────────────────────────────────────────────────────

/// Scheduler backed by tokio timers. Fired tokens arrive on the channel
/// passed to [`TokioScheduler::new`].
pub struct TokioScheduler {
    handle: Handle,
    fired_tx: mpsc::UnboundedSender<TaskToken>,
    next: AtomicU64,
    tasks: Mutex<HashMap<TaskToken, JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Creates a scheduler on the current tokio runtime.
    pub fn new(fired_tx: mpsc::UnboundedSender<TaskToken>) -> SyncResult<Self> {
        let handle = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        Ok(Self {
            handle,
            fired_tx,
            next: AtomicU64::new(0),
            tasks: Mutex::new(HashMap::new()),
        })
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration) -> TaskToken {
        let token = TaskToken::new(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        let tx = self.fired_tx.clone();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(token).is_err() {
                debug!(%token, "Timer fired after receiver closed");
            }
        });

        let mut tasks = lock(&self.tasks);
        tasks.retain(|_, task| !task.is_finished());
        tasks.insert(token, task);
        token
    }

    fn cancel(&self, token: TaskToken) {
        if let Some(task) = lock(&self.tasks).remove(&token) {
            task.abort();
            trace!(%token, "Cancelled timer");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in lock(&self.tasks).drain() {
            task.abort();
        }
    }
}
