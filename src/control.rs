//! Run control
//!
//! Cooperative cancellation for long optimization runs. A [`StopFlag`] is a
//! cheaply clonable handle shared between the driver and the swarm; the
//! swarm polls it once per iteration boundary and winds down cleanly when it
//! has been raised. Cancellation is a normal outcome, not an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared cancellation handle
///
/// Raising the flag is sticky: once triggered it stays triggered for the
/// remainder of the run.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    inner: Arc<AtomicBool>,
}

impl StopFlag {
    /// Create a new, unraised flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn trigger(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested
    pub fn should_stop(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Ran the full iteration count
    Completed,
    /// Stopped early by a raised [`StopFlag`]
    Cancelled,
}
