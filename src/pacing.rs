//! # Pacing Controller
//!
//! A delay primitive: each call to [`Pacer::wait`] sleeps for a duration drawn
//! uniformly from `[min, max]`. It keeps no history of past requests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub struct Pacer {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl Pacer {
    /// Creates a pacer with an explicit random source.
    ///
    /// If `min > max` the bounds are swapped.
    pub fn new(min: Duration, max: Duration, rng: StdRng) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, max, rng }
    }

    /// Creates a pacer seeded from the operating system.
    pub fn from_entropy(min: Duration, max: Duration) -> Self {
        Self::new(min, max, StdRng::from_entropy())
    }

    /// A pacer that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, StdRng::seed_from_u64(0))
    }

    /// Draws the next delay without sleeping.
    pub fn next_delay(&mut self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        self.rng.gen_range(self.min..=self.max)
    }

    /// Sleeps for the next delay and returns how long it was.
    pub async fn wait(&mut self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "pacing");
            tokio::time::sleep(delay).await;
        }
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_delays_stay_within_bounds() {
        let min = Duration::from_millis(2000);
        let max = Duration::from_millis(4000);
        let mut pacer = Pacer::new(min, max, StdRng::seed_from_u64(42));
        for _ in 0..10_000 {
            let delay = pacer.next_delay();
            assert!(delay >= min && delay <= max, "{delay:?} out of bounds");
        }
    }

    #[test]
    fn sampled_delays_vary() {
        let mut pacer = Pacer::new(
            Duration::from_millis(0),
            Duration::from_millis(1000),
            StdRng::seed_from_u64(7),
        );
        let first = pacer.next_delay();
        assert!((0..100).any(|_| pacer.next_delay() != first));
    }

    #[test]
    fn equal_bounds_give_fixed_delay() {
        let d = Duration::from_millis(250);
        let mut pacer = Pacer::new(d, d, StdRng::seed_from_u64(1));
        assert_eq!(pacer.next_delay(), d);
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let mut pacer = Pacer::new(
            Duration::from_secs(4),
            Duration::from_secs(2),
            StdRng::seed_from_u64(1),
        );
        for _ in 0..1000 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_secs(2) && delay <= Duration::from_secs(4));
        }
    }

    #[tokio::test]
    async fn disabled_pacer_returns_immediately() {
        let mut pacer = Pacer::disabled();
        assert_eq!(pacer.wait().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_sampled_delay() {
        let min = Duration::from_secs(2);
        let max = Duration::from_secs(4);
        let mut pacer = Pacer::new(min, max, StdRng::seed_from_u64(3));
        let start = tokio::time::Instant::now();
        let delay = pacer.wait().await;
        assert!(start.elapsed() >= delay);
        assert!(delay >= min && delay <= max);
    }
}
