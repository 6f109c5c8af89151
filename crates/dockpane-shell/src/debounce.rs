//! Cancel-and-reschedule timer for coalescing event bursts

use std::time::{Duration, Instant};

/// A one-shot deadline that each new event pushes forward
///
/// Only the final firing performs the deferred action; a burst of events
/// inside the delay window collapses into one firing.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the delay from `now`, returning the new deadline
    pub fn bump(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    /// Drop any pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_restarts_the_delay() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let start = Instant::now();

        let first = debounce.bump(start);
        let second = debounce.bump(start + Duration::from_millis(50));
        assert!(second > first);

        // The first deadline no longer fires
        assert!(!debounce.fire_due(start + Duration::from_millis(100)));
        // The rescheduled one does
        assert!(debounce.fire_due(start + Duration::from_millis(150)));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_fire_due_is_one_shot() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let start = Instant::now();
        debounce.bump(start);

        assert!(debounce.fire_due(start + Duration::from_millis(100)));
        assert!(!debounce.fire_due(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let start = Instant::now();
        debounce.bump(start);
        debounce.cancel();

        assert!(!debounce.is_pending());
        assert!(!debounce.fire_due(start + Duration::from_secs(1)));
    }
}
