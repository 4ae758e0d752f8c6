use std::time::{Duration, Instant};

/// One armed repeating deadline.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Cadence {
    interval: Duration,
    next_due: Instant,
}

/// Fixed-interval tick scheduler for a single-threaded loop.
///
/// Holds at most one cadence. The caller polls it with the current time and
/// runs a tick whenever [`Scheduler::poll`] returns true, so ticks never
/// overlap.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    cadence: Option<Cadence>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the scheduler; the first tick is due one `interval` after `now`.
    ///
    /// Replaces any cadence that was already running.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        debug_assert!(!interval.is_zero(), "tick interval must be positive");

        self.cadence = Some(Cadence {
            interval,
            next_due: now + interval,
        });
    }

    /// Swaps the running cadence for a new interval. No-op when stopped.
    pub fn restart(&mut self, interval: Duration, now: Instant) {
        if self.cadence.take().is_some() {
            self.start(interval, now);
        }
    }

    /// Disarms the scheduler. Calling it again is a no-op.
    pub fn stop(&mut self) {
        self.cadence = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cadence.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.cadence.map(|cadence| cadence.interval)
    }

    /// Returns true when a tick is due, consuming that one deadline.
    ///
    /// A loop that fell more than one interval behind is re-based on `now`
    /// instead of firing the missed ticks back to back.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(cadence) = self.cadence.as_mut() else {
            return false;
        };
        if now < cadence.next_due {
            return false;
        }

        cadence.next_due += cadence.interval;
        if cadence.next_due <= now {
            cadence.next_due = now + cadence.interval;
        }
        true
    }

    /// Time left before the next tick, or `None` while stopped.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.cadence
            .map(|cadence| cadence.next_due.saturating_duration_since(now))
    }
}
