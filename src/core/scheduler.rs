//! Per-surface scheduler — decides which samples get mapped and applied, and
//! guarantees a surface never has two live animation tasks.
//!
//! ```text
//! idle ──start──▶ running ──terminal sample──▶ completed
//!                    │
//!                    └──cancel / restart / dispose──▶ cancelled
//! ```

use std::time::Duration;

use super::cancel::CancelToken;
use super::signal::SignalKind;

/// Lifecycle phase of an [`AnimationTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// How often a running task re-samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Every animation frame.
    PerFrame,
    /// Every host event the source reacts to.
    PerEvent,
    /// At most once per interval (timer-style counters).  The terminal
    /// sample of an elapsed-time signal is never throttled away.
    FixedInterval(Duration),
}

impl Cadence {
    /// Natural cadence of a signal kind.
    pub fn for_signal(kind: &SignalKind) -> Self {
        match kind {
            SignalKind::ElapsedTime { .. } => Cadence::PerFrame,
            _ => Cadence::PerEvent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

/// One active scheduling loop.
#[derive(Debug)]
pub struct AnimationTask {
    pub id: TaskId,
    pub cadence: Cadence,
    phase: Phase,
    last_sampled_at: Option<Duration>,
    cancel: CancelToken,
}

impl AnimationTask {
    pub fn phase(&self) -> Phase {
        if self.phase == Phase::Running && self.cancel.is_cancelled() {
            Phase::Cancelled
        } else {
            self.phase
        }
    }

    pub fn last_sampled_at(&self) -> Option<Duration> {
        self.last_sampled_at
    }
}

/// When a sample was taken and whether it closes the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTime {
    pub at: Duration,
    /// Came from a frame tick (must be strictly newer than the last sample)
    /// rather than a discrete event (may share the current frame's time).
    pub from_frame: bool,
    pub terminal: bool,
}

/// Owns at most one [`AnimationTask`] at a time.
#[derive(Debug, Default)]
pub struct Scheduler {
    current: Option<AnimationTask>,
    next_id: u64,
    /// Every task token is a child of this one.
    lifetime: CancelToken,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler whose tasks all end when `lifetime` is cancelled.
    pub fn with_lifetime(lifetime: CancelToken) -> Self {
        Self {
            lifetime,
            ..Self::default()
        }
    }

    /// Start a fresh task, cancelling any task still running first.
    pub fn start(&mut self, cadence: Cadence, now: Duration) -> CancelToken {
        self.cancel();
        self.next_id += 1;
        let token = self.lifetime.child();
        let task = AnimationTask {
            id: TaskId(self.next_id),
            cadence,
            phase: Phase::Running,
            last_sampled_at: None,
            cancel: token.clone(),
        };
        tracing::debug!(task = task.id.0, ?cadence, at = ?now, "animation task started");
        self.current = Some(task);
        token
    }

    /// Cancel the running task, if any.  No-op otherwise.
    pub fn cancel(&mut self) {
        if let Some(task) = self.current.as_mut() {
            task.cancel.cancel();
            if task.phase == Phase::Running {
                task.phase = Phase::Cancelled;
                tracing::debug!(task = task.id.0, "animation task cancelled");
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.current.as_ref().map_or(Phase::Idle, AnimationTask::phase)
    }

    pub fn task(&self) -> Option<&AnimationTask> {
        self.current.as_ref()
    }

    /// `true` while the current task may still deliver outputs.
    pub fn is_live(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Decide whether a sample should be mapped and applied, recording it if so.
    pub fn admit(&mut self, time: SampleTime) -> bool {
        let Some(task) = self.current.as_mut() else {
            return false;
        };
        if task.phase() != Phase::Running {
            task.phase = task.phase();
            return false;
        }

        if let Some(last) = task.last_sampled_at {
            let stale = if time.from_frame {
                time.at <= last
            } else {
                time.at < last
            };
            if stale && !time.terminal {
                tracing::trace!(task = task.id.0, ?time, "dropping out-of-order sample");
                return false;
            }
            if let Cadence::FixedInterval(every) = task.cadence {
                if !time.terminal && time.at.saturating_sub(last) < every {
                    return false;
                }
            }
        }

        task.last_sampled_at = Some(match task.last_sampled_at {
            Some(last) => last.max(time.at),
            None => time.at,
        });
        true
    }

    /// The terminal sample has been applied; stop for good.
    pub fn complete(&mut self) {
        if let Some(task) = self.current.as_mut() {
            if task.phase() == Phase::Running {
                task.phase = Phase::Completed;
                tracing::debug!(task = task.id.0, "animation task completed");
            }
        }
    }
}
