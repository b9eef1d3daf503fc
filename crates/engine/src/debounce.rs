//! Single-shot debounce timer.

use std::time::Duration;

use tokio::time::Instant;

/// Single-shot countdown with restart semantics.
///
/// Restarting while pending discards the previous deadline; only the most
/// recent deadline can ever fire. Hardware reports connect/disconnect
/// events individually, so an unbounded burst of restarts coalesces into
/// one settle signal at `duration` after the last restart.
///
/// The timer does no sleeping itself: it exposes the pending deadline and
/// the engine loop `sleep_until`s it, which keeps restarts equivalent to
/// cancel-then-schedule without any cancellation token.
#[derive(Debug)]
pub struct DebounceTimer {
    duration: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change the countdown used by subsequent restarts. A pending deadline
    /// keeps its original schedule until the next restart.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Arm (or re-arm) the timer; the new deadline supersedes any pending
    /// one.
    pub fn restart(&mut self) {
        self.deadline = Some(Instant::now() + self.duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Acknowledge that the pending deadline elapsed; the timer returns to
    /// idle until the next restart.
    pub fn fired(&mut self) {
        self.deadline = None;
    }
}
