//! Trailing-edge debouncer for high-frequency inputs

use std::time::{Duration, Instant};

/// Holds the latest value until input has been quiet for `delay`.
///
/// The last pushed value is always delivered, either by [`Debouncer::poll`]
/// once the delay has elapsed or by [`Debouncer::flush`].
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value if the quiet period has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Take the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How long until `poll` would fire, if anything is pending
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_value_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));

        debouncer.push("h", start);
        debouncer.push("ha", start + Duration::from_millis(50));
        debouncer.push("hal", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), Some("hal"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_flush_never_loses_final_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_secs(10));
        debouncer.push(3, start);
        assert_eq!(debouncer.flush(), Some(3));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_time_remaining() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        assert_eq!(debouncer.time_remaining(start), None);
        debouncer.push((), start);
        assert_eq!(debouncer.time_remaining(start + Duration::from_millis(40)), Some(Duration::from_millis(60)));
        assert_eq!(debouncer.time_remaining(start + Duration::from_millis(400)), Some(Duration::ZERO));
    }
}
