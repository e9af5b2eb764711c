//! Backoff between optimistic retry cycles.

use rand::Rng;
use std::time::Duration;

use crate::config::BackoffConfig;

/// Exponential backoff: `min(base * multiplier^(retry-1), max)`, optional ±25% jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryBackoff {
    base: Duration,
    multiplier: f64,
    max: Duration,
    jitter_enabled: bool,
}

impl RetryBackoff {
    pub fn new(base: Duration, multiplier: f64, max: Duration, jitter_enabled: bool) -> Self {
        Self {
            base,
            multiplier: multiplier.max(1.0),
            max,
            jitter_enabled,
        }
    }

    /// Retry immediately
    pub fn none() -> Self {
        Self::new(Duration::ZERO, 1.0, Duration::ZERO, false)
    }

    pub fn from_config(config: &BackoffConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_ms),
            config.multiplier,
            Duration::from_millis(config.max_ms),
            config.jitter_enabled,
        )
    }

    pub fn is_disabled(&self) -> bool {
        self.base.is_zero()
    }

    /// Pause before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.is_disabled() || retry == 0 {
            return Duration::ZERO;
        }

        let exponent = (retry - 1).min(32) as i32;
        let scaled = self.base.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max.as_secs_f64());

        let jittered = if self.jitter_enabled {
            capped * rand::thread_rng().gen_range(0.75..=1.25)
        } else {
            capped
        };

        Duration::from_secs_f64(jittered.max(0.0))
    }

    pub async fn wait(&self, retry: u32) {
        let delay = self.delay_for(retry);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryBackoff {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_backoff_never_waits() {
        let backoff = RetryBackoff::none();
        assert!(backoff.is_disabled());
        assert_eq!(backoff.delay_for(1), Duration::ZERO);
        assert_eq!(backoff.delay_for(10), Duration::ZERO);
    }

    #[test]
    fn test_exponential_growth_is_capped() {
        let backoff = RetryBackoff::new(
            Duration::from_millis(10),
            2.0,
            Duration::from_millis(50),
            false,
        );
        assert_eq!(backoff.delay_for(1), Duration::from_millis(10));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(20));
        assert_eq!(backoff.delay_for(3), Duration::from_millis(40));
        assert_eq!(backoff.delay_for(4), Duration::from_millis(50));
        assert_eq!(backoff.delay_for(30), Duration::from_millis(50));
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let backoff = RetryBackoff::new(
            Duration::from_millis(100),
            1.0,
            Duration::from_millis(100),
            true,
        );
        for _ in 0..100 {
            let delay = backoff.delay_for(1);
            assert!(delay >= Duration::from_millis(74));
            assert!(delay <= Duration::from_millis(126));
        }
    }
}
