//! Cancellable one-shot deadline.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// A deadline that can be armed, re-armed, and cancelled.
///
/// Arming replaces any earlier deadline, so a timer never fires twice for
/// overlapping schedules.
#[derive(Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `after` from now.
    pub fn schedule(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
    }

    /// Disarm the timer. Safe to call when already disarmed.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves at the deadline; never resolves while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
