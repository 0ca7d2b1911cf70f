//! Deferred and repeating callbacks
//!
//! Provides:
//! - One-shot tasks: fire once after a delay (swap offer expiry)
//! - Repeating tasks: fire on a fixed cadence (shockwave pulses)
//! - Cancellation by handle
//!
//! Nothing here spawns threads or tasks. The host drives [`Scheduler::tick`]
//! from its simulation loop and the engine reacts to whatever came due, so
//! all waiting is deferred re-invocation. Tasks are in-memory only: pending
//! offers and running effects intentionally do not survive a restart.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::identity::PlayerId;

/// Handle identifying a scheduled task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// What to do when a task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// A pending swap offer reached its deadline
    OfferExpiry { killer: PlayerId },
    /// A live shockwave is due for its next expansion pulse
    ShockwavePulse { pulse: Uuid },
}

/// A task that fires once at a wall-clock deadline
#[derive(Debug, Clone)]
pub struct OneShot {
    pub kind: TaskKind,
    /// Unix timestamp (ms) when the task should fire
    pub fire_at: i64,
}

impl OneShot {
    pub fn new(kind: TaskKind, delay_ms: u64) -> Self {
        Self {
            kind,
            fire_at: chrono::Utc::now().timestamp_millis() + delay_ms as i64,
        }
    }

    pub fn is_due(&self) -> bool {
        chrono::Utc::now().timestamp_millis() >= self.fire_at
    }
}

/// A task that fires on a fixed cadence until cancelled
#[derive(Debug, Clone)]
pub struct Repeating {
    pub kind: TaskKind,
    pub interval: Duration,
    /// Next instant the task is due; starts due immediately
    pub next_due: Instant,
}

impl Repeating {
    pub fn new(kind: TaskKind, interval_ms: u64) -> Self {
        Self {
            kind,
            interval: Duration::from_millis(interval_ms),
            next_due: Instant::now(),
        }
    }

    pub fn is_due(&self) -> bool {
        Instant::now() >= self.next_due
    }

    /// Re-arm after firing
    pub fn reset(&mut self) {
        self.next_due = Instant::now() + self.interval;
    }
}

/// A task that came due during a tick
#[derive(Debug, Clone, Copy)]
pub struct FiredTask {
    pub id: TaskId,
    pub kind: TaskKind,
}

/// Poll-driven task table
#[derive(Debug, Default)]
pub struct Scheduler {
    one_shots: RwLock<HashMap<TaskId, OneShot>>,
    repeating: RwLock<HashMap<TaskId, Repeating>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-shot task
    pub async fn add_one_shot(&self, task: OneShot) -> TaskId {
        let id = TaskId::fresh();
        self.one_shots.write().await.insert(id, task);
        id
    }

    /// Schedule a one-shot after a delay
    pub async fn schedule_once(&self, kind: TaskKind, delay_ms: u64) -> TaskId {
        self.add_one_shot(OneShot::new(kind, delay_ms)).await
    }

    /// Schedule a repeating task; the first fire happens on the next tick
    pub async fn schedule_repeating(&self, kind: TaskKind, interval_ms: u64) -> TaskId {
        let id = TaskId::fresh();
        self.repeating
            .write()
            .await
            .insert(id, Repeating::new(kind, interval_ms));
        id
    }

    /// Cancel a task of either kind. Returns whether it was still live.
    pub async fn cancel(&self, id: TaskId) -> bool {
        self.one_shots.write().await.remove(&id).is_some()
            || self.repeating.write().await.remove(&id).is_some()
    }

    /// Drop every outstanding task (engine shutdown)
    pub async fn cancel_all(&self) {
        self.one_shots.write().await.clear();
        self.repeating.write().await.clear();
    }

    /// Collect everything that came due. Fired one-shots are removed;
    /// fired repeating tasks are re-armed.
    pub async fn tick(&self) -> Vec<FiredTask> {
        let mut fired = Vec::new();

        {
            let mut one_shots = self.one_shots.write().await;
            let due: Vec<TaskId> = one_shots
                .iter()
                .filter(|(_, t)| t.is_due())
                .map(|(id, _)| *id)
                .collect();
            for id in due {
                if let Some(task) = one_shots.remove(&id) {
                    fired.push(FiredTask { id, kind: task.kind });
                }
            }
        }

        {
            let mut repeating = self.repeating.write().await;
            for (id, task) in repeating.iter_mut() {
                if task.is_due() {
                    fired.push(FiredTask {
                        id: *id,
                        kind: task.kind,
                    });
                    task.reset();
                }
            }
        }

        fired
    }

    /// Count of outstanding tasks of both kinds
    pub async fn task_count(&self) -> usize {
        self.one_shots.read().await.len() + self.repeating.read().await.len()
    }
}
