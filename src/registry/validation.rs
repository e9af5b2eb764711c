//! Simulated external validation for the optimistic discipline.
//!
//! The window between the optimistic read and the commit stands in for real
//! latency such as a payment check. It is a scheduled wake, never a busy wait.

use async_trait::async_trait;
use rand::Rng;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ValidationConfig;
use crate::models::SeatId;

/// Suspension run between an optimistic read and its commit
#[async_trait]
pub trait ValidationDelay: Send + Sync + Debug {
    /// Wait out the validation window for one booking cycle
    async fn validate(&self, seat_id: SeatId);

    fn name(&self) -> &'static str;
}

/// Commit immediately after the read
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidationDelay;

#[async_trait]
impl ValidationDelay for NoValidationDelay {
    async fn validate(&self, _seat_id: SeatId) {
        tokio::task::yield_now().await;
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedValidationDelay {
    delay: Duration,
}

impl FixedValidationDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ValidationDelay for FixedValidationDelay {
    async fn validate(&self, _seat_id: SeatId) {
        tokio::time::sleep(self.delay).await;
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Uniformly distributed delay in `[min, max]`
#[derive(Debug, Clone, Copy)]
pub struct RandomValidationDelay {
    min: Duration,
    max: Duration,
}

impl RandomValidationDelay {
    /// Bounds are swapped if given in the wrong order
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    fn sample(&self) -> Duration {
        let min = self.min.as_micros() as u64;
        let max = self.max.as_micros() as u64;
        Duration::from_micros(rand::thread_rng().gen_range(min..=max))
    }
}

#[async_trait]
impl ValidationDelay for RandomValidationDelay {
    async fn validate(&self, _seat_id: SeatId) {
        let delay = self.sample();
        tokio::time::sleep(delay).await;
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Pick the validator matching the configured window
pub fn from_config(config: &ValidationConfig) -> Arc<dyn ValidationDelay> {
    match (config.min_delay_ms, config.max_delay_ms) {
        (_, 0) => Arc::new(NoValidationDelay),
        (min, max) if min == max => Arc::new(FixedValidationDelay::new(config.min_delay())),
        _ => Arc::new(RandomValidationDelay::new(
            config.min_delay(),
            config.max_delay(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_stays_within_bounds() {
        let delay =
            RandomValidationDelay::new(Duration::from_millis(20), Duration::from_millis(5));
        for _ in 0..200 {
            let sampled = delay.sample();
            assert!(sampled >= Duration::from_millis(5));
            assert!(sampled <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_from_config_selects_validator() {
        let none = from_config(&ValidationConfig::default());
        assert_eq!(none.name(), "none");

        let fixed = from_config(&ValidationConfig {
            min_delay_ms: 10,
            max_delay_ms: 10,
        });
        assert_eq!(fixed.name(), "fixed");

        let random = from_config(&ValidationConfig {
            min_delay_ms: 1,
            max_delay_ms: 10,
        });
        assert_eq!(random.name(), "random");
    }

    #[tokio::test]
    async fn test_fixed_delay_waits_on_the_timer() {
        let start = tokio::time::Instant::now();
        FixedValidationDelay::new(Duration::from_millis(20))
            .validate(1)
            .await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
