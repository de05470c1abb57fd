//! Deadline debouncer for resize bursts
//!
//! Every trigger pushes the deadline out by `delay`; `poll` fires once the
//! burst has been quiet for that long. Time is passed in, so the event loop
//! owns the clock and tests don't sleep.

use std::time::{Duration, Instant};

/// Quiet period before a resize burst triggers a render
pub const DEFAULT_RESIZE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DELAY)
    }
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Record an event at `now`, restarting the quiet period
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per burst, when `now` has reached the deadline
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// How long the event loop may block before the next `poll` is due
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(now))
    }
}
