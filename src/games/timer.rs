use std::time::{Duration, Instant};

/// A one-shot timer owned by a session value.
///
/// Nothing runs in the background: the owner polls `is_due` from its loop,
/// and dropping the session drops the timer with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline
{
    at: Instant,
}

impl Deadline
{
    pub fn after(now: Instant, delay: Duration) -> Self
    {
        Self { at: now + delay }
    }

    pub fn is_due(&self, now: Instant) -> bool
    {
        now >= self.at
    }

    pub fn remaining(&self, now: Instant) -> Duration
    {
        self.at.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn due_after_delay()
    {
        let now = Instant::now();
        let deadline = Deadline::after(now, Duration::from_millis(1500));
        assert!(!deadline.is_due(now));
        assert!(!deadline.is_due(now + Duration::from_millis(1499)));
        assert!(deadline.is_due(now + Duration::from_millis(1500)));
        assert_eq!(deadline.remaining(now + Duration::from_secs(5)), Duration::ZERO);
    }
}
