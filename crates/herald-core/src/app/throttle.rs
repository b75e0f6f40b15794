//! Throttle - leading-edge rate limiter.
//!
//! The first value in a window passes straight through. Values offered while
//! the window is closed are coalesced; the latest one is released by `flush`
//! once the window has elapsed (the trailing edge).
//!
//! Example with window=100ms, values offered at 0, 10, 20 ms:
//! - 0ms: passes (leading edge)
//! - 10ms, 20ms: held, only the 20ms value is kept
//! - 100ms: `flush` releases the 20ms value

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct Throttle<T> {
    window: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Offer a value. Returns it if it may fire now.
    pub fn offer(&mut self, now: Instant, value: T) -> Option<T> {
        match self.last_fired {
            Some(last) if now < last + self.window => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_fired = Some(now);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// When the held value may be flushed, if one is held.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_fired.map(|last| last + self.window)
    }

    /// Release the held value if its deadline has passed.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_fired = Some(now);
        self.pending.take()
    }

    /// Drop the held value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn leading_edge_fires_immediately() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        assert_eq!(throttle.offer(t0, 1), Some(1));
        assert_eq!(throttle.deadline(), None);
    }

    #[test]
    fn burst_is_coalesced_to_the_latest_value() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let fired: Vec<_> = (0..50)
            .filter_map(|i| throttle.offer(t0 + ms(i), i))
            .collect();

        assert_eq!(fired, vec![0]);
        assert_eq!(throttle.deadline(), Some(t0 + WINDOW));
        assert_eq!(throttle.flush(t0 + ms(99)), None);
        assert_eq!(throttle.flush(t0 + WINDOW), Some(49));
        assert_eq!(throttle.flush(t0 + ms(300)), None);
    }

    #[test]
    fn next_window_fires_again() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        assert_eq!(throttle.offer(t0, "a"), Some("a"));
        assert_eq!(throttle.offer(t0 + ms(50), "b"), None);
        assert_eq!(throttle.offer(t0 + ms(150), "c"), Some("c"));
        // "b" was superseded by the leading edge of the next window
        assert_eq!(throttle.deadline(), None);
    }

    #[test]
    fn cancel_drops_the_trailing_value() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        throttle.offer(t0, 1);
        throttle.offer(t0 + ms(10), 2);
        throttle.cancel();
        assert_eq!(throttle.flush(t0 + ms(500)), None);
    }
}
