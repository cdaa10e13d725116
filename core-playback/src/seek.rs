//! Edge-triggered external seek.
//!
//! The caller hands the player an optional seek time on every update. The
//! position is only forced when the value changes, so re-rendering with the
//! same value does not yank the playhead back.

/// Remembers the last externally supplied seek time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeekSignal {
    last: Option<f64>,
}

impl SeekSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current signal value.
    ///
    /// Returns the time to seek to when `value` differs from the previously
    /// observed one. `None` clears the edge tracking so the next value fires
    /// even if it equals the one before the reset.
    pub fn observe(&mut self, value: Option<f64>) -> Option<f64> {
        match value {
            None => {
                self.last = None;
                None
            }
            Some(time) if self.last == Some(time) => None,
            Some(time) => {
                self.last = Some(time);
                Some(time)
            }
        }
    }

    /// Last value observed, if any.
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_first_value() {
        let mut signal = SeekSignal::new();
        assert_eq!(signal.observe(Some(30.0)), Some(30.0));
        assert_eq!(signal.last(), Some(30.0));
    }

    #[test]
    fn test_same_value_fires_once() {
        let mut signal = SeekSignal::new();
        assert_eq!(signal.observe(Some(30.0)), Some(30.0));
        assert_eq!(signal.observe(Some(30.0)), None);
        assert_eq!(signal.observe(Some(45.0)), Some(45.0));
    }

    #[test]
    fn test_none_resets_edge_tracking() {
        let mut signal = SeekSignal::new();
        signal.observe(Some(30.0));
        assert_eq!(signal.observe(None), None);
        assert_eq!(signal.observe(Some(30.0)), Some(30.0));
    }

    #[test]
    fn test_reset() {
        let mut signal = SeekSignal::new();
        signal.observe(Some(5.0));
        signal.reset();
        assert_eq!(signal.last(), None);
        assert_eq!(signal.observe(Some(5.0)), Some(5.0));
    }
}
