//! Latest-value-wins debouncing for settings that are saved while the user is still editing.

use std::time::{Duration, Instant};

/// Quiet period before a preset temperature edit is persisted.
pub const PRESET_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Debouncer { quiet, pending: None }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(v, _)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value is due; `None` when nothing is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| (*at + self.quiet).saturating_duration_since(now))
    }

    /// Hand out the pending value once the quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.remaining(now) {
            Some(left) if left.is_zero() => self.flush(),
            _ => None,
        }
    }

    /// Hand out the pending value regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_value_wins_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(PRESET_SAVE_DEBOUNCE);
        d.push(20.0, t0);
        d.push(20.5, t0 + Duration::from_millis(300));

        assert_eq!(d.take_due(t0 + Duration::from_millis(600)), None);
        assert_eq!(d.remaining(t0 + Duration::from_millis(600)), Some(Duration::from_millis(200)));
        assert_eq!(d.take_due(t0 + Duration::from_millis(800)), Some(20.5));
        assert!(!d.is_pending());
        assert_eq!(d.remaining(t0), None);
    }

    #[test]
    fn flush_ignores_timing() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_secs(10));
        d.push("comfort", t0);
        assert_eq!(d.peek(), Some(&"comfort"));
        assert_eq!(d.flush(), Some("comfort"));
        assert_eq!(d.flush(), None);
    }
}
