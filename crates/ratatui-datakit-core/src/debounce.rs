use std::time::Duration;
use std::time::Instant;

/// A poll-style debounce deadline.
///
/// Each [`schedule`](Self::schedule) pushes the deadline `delay` into the future;
/// [`fire`](Self::fire) returns `true` exactly once when the deadline has passed.
/// There are no timers and no runtime: the app calls `fire` from its event loop.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
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
    fn fires_once_after_delay() {
        let mut d = Debounce::new(Duration::from_millis(100));
        let t0 = Instant::now();
        d.schedule(t0);
        assert!(!d.fire(t0));
        assert!(!d.fire(t0 + Duration::from_millis(99)));
        assert!(d.fire(t0 + Duration::from_millis(100)));
        assert!(!d.fire(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn rescheduling_pushes_the_deadline() {
        let mut d = Debounce::new(Duration::from_millis(100));
        let t0 = Instant::now();
        d.schedule(t0);
        d.schedule(t0 + Duration::from_millis(50));
        assert!(!d.fire(t0 + Duration::from_millis(100)));
        assert!(d.fire(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn cancel_discards_the_deadline() {
        let mut d = Debounce::default();
        let t0 = Instant::now();
        d.schedule(t0);
        d.cancel();
        assert!(!d.pending());
        assert!(!d.fire(t0 + Duration::from_secs(10)));
    }
}
