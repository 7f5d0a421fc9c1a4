//! Process-wide session lifecycle.
//!
//! Transitions: `Idle → Starting` (`try_start`), `Starting → Running`
//! (`StartPermit::promote`), `Starting → Idle` (permit dropped),
//! `Running → Idle` (`RunningGuard::finish` or guard dropped). At most one
//! session is ever Starting or Running.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    /// A session is being constructed.
    Starting,
    Running,
}

/// How the most recent session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Ended { conversation_id: String },
    Failed { error: String },
}

/// Returned by [`Lifecycle::try_start`] when a session is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a conversation is already {}", status_word(.0))]
pub struct AlreadyActive(pub SessionStatus);

fn status_word(status: &SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "idle",
        SessionStatus::Starting => "starting",
        SessionStatus::Running => "running",
    }
}

#[derive(Debug, Default)]
struct LifecycleState {
    status: SessionStatus,
    last_outcome: Option<SessionOutcome>,
    sessions_started: u64,
}

/// Shared lifecycle cell. Clone the `Arc` to hand it to other threads.
#[derive(Debug, Default)]
pub struct Lifecycle {
    inner: Mutex<LifecycleState>,
}

impl Lifecycle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically move `Idle → Starting`.
    pub fn try_start(self: &Arc<Self>) -> Result<StartPermit, AlreadyActive> {
        let mut state = self.lock();
        if state.status != SessionStatus::Idle {
            return Err(AlreadyActive(state.status));
        }
        state.status = SessionStatus::Starting;
        Ok(StartPermit {
            lifecycle: Some(Arc::clone(self)),
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// Whether a session is starting or running.
    pub fn is_active(&self) -> bool {
        self.status() != SessionStatus::Idle
    }

    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.lock().last_outcome.clone()
    }

    /// Number of sessions that reached Running.
    pub fn sessions_started(&self) -> u64 {
        self.lock().sessions_started
    }

    fn set_idle(&self, outcome: Option<SessionOutcome>) {
        let mut state = self.lock();
        state.status = SessionStatus::Idle;
        if outcome.is_some() {
            state.last_outcome = outcome;
        }
    }
}

/// Exclusive right to construct a session. Dropping it returns the lifecycle
/// to Idle.
#[derive(Debug)]
pub struct StartPermit {
    lifecycle: Option<Arc<Lifecycle>>,
}

impl StartPermit {
    /// Move `Starting → Running` and hand back the guard the runner holds.
    pub fn promote(mut self) -> RunningGuard {
        let lifecycle = self.lifecycle.take();
        if let Some(lifecycle) = &lifecycle {
            let mut state = lifecycle.lock();
            state.status = SessionStatus::Running;
            state.sessions_started += 1;
        }
        RunningGuard { lifecycle }
    }
}

impl Drop for StartPermit {
    fn drop(&mut self) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.set_idle(None);
        }
    }
}

/// Held by the session runner while a session is Running.
///
/// The lifecycle returns to Idle when the guard is finished or dropped, so a
/// runner that panics cannot block future sessions.
#[derive(Debug)]
pub struct RunningGuard {
    lifecycle: Option<Arc<Lifecycle>>,
}

impl RunningGuard {
    /// Record the outcome and move `Running → Idle`.
    pub fn finish(mut self, outcome: SessionOutcome) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.set_idle(Some(outcome));
        }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.set_idle(Some(SessionOutcome::Failed {
                error: "session runner exited without reporting an outcome".into(),
            }));
        }
    }
}
