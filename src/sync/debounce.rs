//! Single-slot debounce timer.
//!
//! At most one task is ever scheduled. Scheduling replaces whatever was
//! pending, so only the newest payload in a burst survives. The host loop
//! drives time by calling [`Debouncer::take_due`] with the current instant.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: Instant,
    payload: T,
}

/// Cancellable delayed task holding one payload.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    slot: Option<Scheduled<T>>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer firing `delay` after the last schedule.
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    /// Schedule `payload`, cancelling anything already pending.
    ///
    /// Returns true if a pending task was replaced.
    pub fn schedule(&mut self, now: Instant, payload: T) -> bool {
        let replaced = self.slot.is_some();
        self.slot = Some(Scheduled {
            due: now + self.delay,
            payload,
        });
        replaced
    }

    /// Drop the pending task, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|scheduled| scheduled.payload)
    }

    /// Take the payload if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        let due = self
            .slot
            .as_ref()
            .is_some_and(|scheduled| scheduled.due <= now);
        if due {
            self.cancel()
        } else {
            None
        }
    }

    /// Deadline of the pending task.
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|scheduled| scheduled.due)
    }

    /// Whether a task is scheduled.
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Peek at the pending payload.
    pub fn pending(&self) -> Option<&T> {
        self.slot.as_ref().map(|scheduled| &scheduled.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(10);

    #[test]
    fn nothing_fires_before_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start, 1);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(9)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn fires_once_at_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start, 1);
        assert_eq!(debouncer.take_due(start + DELAY), Some(1));
        assert_eq!(debouncer.take_due(start + DELAY * 2), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn rescheduling_keeps_only_latest_payload() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert!(!debouncer.schedule(start, "r1"));
        assert!(debouncer.schedule(start + Duration::from_millis(3), "r2"));
        assert!(debouncer.schedule(start + Duration::from_millis(6), "r3"));

        // The first deadline has passed but it was superseded.
        assert_eq!(debouncer.take_due(start + DELAY), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(16)),
            Some("r3")
        );
    }

    #[test]
    fn cancel_drops_pending_task() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start, 7);
        assert_eq!(debouncer.cancel(), Some(7));
        assert_eq!(debouncer.take_due(start + DELAY * 10), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.schedule(start, ());
        assert_eq!(debouncer.take_due(start), Some(()));
    }
}
