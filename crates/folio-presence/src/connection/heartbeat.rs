//! Server-paced heartbeat schedule.

use std::time::Duration;

use super::timer::Timer;

/// Heartbeat schedule for one gateway connection.
///
/// Starts when the gateway announces an interval and repeats at exactly that
/// interval. A new announcement replaces the schedule rather than adding a
/// second one.
#[derive(Debug, Default)]
pub struct Heartbeat {
    interval: Option<Duration>,
    timer: Timer,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin heartbeating every `interval`, dropping any pending beat.
    pub fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.timer.schedule(interval);
    }

    /// Arm the next beat after one was sent.
    pub fn reschedule(&mut self) {
        if let Some(interval) = self.interval {
            self.timer.schedule(interval);
        }
    }

    /// Stop heartbeating. Safe to call when not running.
    pub fn stop(&mut self) {
        self.interval = None;
        self.timer.cancel();
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Resolves when the next beat is due; never while stopped.
    pub async fn due(&self) {
        self.timer.expired().await
    }
}
