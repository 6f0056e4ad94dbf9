//! Leading/trailing rate limiter for measured values.
//!
//! A [`Throttle`] lets at most one value through per interval. With `leading`
//! set, the first value after a quiet period passes immediately; values that
//! arrive inside the window are coalesced and the latest one is released at
//! the window's end by [`poll`](Throttle::poll).

use std::time::Duration;

use tokio::time::Instant;

use super::config::ThrottleConfig;

#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    leading: bool,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            interval: config.interval,
            leading: config.leading,
            last_emit: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a value. Returns it back if it may be applied now.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        let window_open = self
            .last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if window_open {
            if self.leading {
                self.pending = None;
                self.last_emit = Some(now);
                return Some(value);
            }
            if self.pending.is_none() {
                self.last_emit = Some(now);
            }
        }
        self.pending = Some(value);
        None
    }

    /// Bypass the limiter, e.g. for the first synchronous measurement.
    ///
    /// Drops any pending value and restarts the window at `now`.
    pub fn emit_now(&mut self, value: T, now: Instant) -> T {
        self.pending = None;
        self.last_emit = Some(now);
        value
    }

    /// Release the pending value if its window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_emit = Some(now);
        self.pending.take()
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        Some(self.last_emit? + self.interval)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait until the pending value is due, then release it.
    pub async fn settle(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.poll(deadline.max(Instant::now()))
    }

    /// Forget pending values and timing.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_emit = None;
    }
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn leading_value_passes_immediately() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let now = Instant::now();
        assert_eq!(t.push(1, now), Some(1));
        assert!(!t.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_latest_trailing_value() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let start = Instant::now();
        assert_eq!(t.push(1, start), Some(1));
        assert_eq!(t.push(2, start + ms(3)), None);
        assert_eq!(t.push(3, start + ms(9)), None);
        assert_eq!(t.deadline(), Some(start + ms(15)));
        assert_eq!(t.poll(start + ms(14)), None);
        assert_eq!(t.poll(start + ms(15)), Some(3));
        assert_eq!(t.poll(start + ms(40)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_one_emission_per_interval() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let start = Instant::now();
        let mut emitted = Vec::new();
        for step in 0..60u64 {
            let now = start + ms(step);
            if let Some(v) = t.poll(now) {
                emitted.push((step, v));
            }
            if let Some(v) = t.push(step, now) {
                emitted.push((step, v));
            }
        }
        for pair in emitted.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= 15, "{emitted:?}");
        }
        assert_eq!(emitted.first(), Some(&(0, 0)));
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_period_reopens_leading_edge() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let start = Instant::now();
        t.push(1, start);
        assert_eq!(t.push(2, start + ms(100)), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn trailing_only_waits_a_full_interval() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)).with_leading(false));
        let start = Instant::now();
        assert_eq!(t.push(7, start), None);
        assert_eq!(t.deadline(), Some(start + ms(15)));
        assert_eq!(t.poll(start + ms(15)), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn emit_now_discards_pending() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let start = Instant::now();
        t.push(1, start);
        t.push(2, start + ms(1));
        assert_eq!(t.emit_now(5, start + ms(2)), 5);
        assert!(!t.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn settle_sleeps_until_due() {
        let mut t = Throttle::new(ThrottleConfig::new(ms(15)));
        let start = Instant::now();
        t.push(1, start);
        t.push(2, start);
        assert_eq!(t.settle().await, Some(2));
        assert!(Instant::now() >= start + ms(15));
        assert_eq!(t.settle().await, None);
    }
}
