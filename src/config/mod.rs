//! # Booking Engine Configuration
//!
//! Typed, validated configuration for the registry, the queue, the worker pool
//! and the optimistic retry policy.
//!
//! ## Layering
//!
//! [`ConfigManager`] merges, lowest priority first:
//!
//! 1. Built-in defaults (every section is `#[serde(default)]`)
//! 2. `config/booking.toml`
//! 3. `config/booking.{environment}.toml`
//! 4. `BOOKING__SECTION__KEY` environment variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use seat_booking::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let seats = manager.config().registry.total_seats;
//! let workers = manager.config().workers.count;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    Discipline, DEFAULT_MAX_RETRIES, DEFAULT_SHUTDOWN_TIMEOUT_MS, DEFAULT_TOTAL_SEATS,
    DEFAULT_WORKER_COUNT,
};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/booking.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Seat registry sizing
    pub registry: RegistryConfig,

    /// Worker pool sizing and pacing
    pub workers: WorkerConfig,

    /// Request queue bounds
    pub queue: QueueConfig,

    /// Active discipline and optimistic retry budget
    pub booking: BookingPolicyConfig,

    /// Optimistic validation window
    pub validation: ValidationConfig,

    /// Pause between optimistic retry cycles
    pub backoff: BackoffConfig,

    /// Graceful shutdown bounds
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub total_seats: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            total_seats: DEFAULT_TOTAL_SEATS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub count: usize,
    /// Pause after each processed request; zero disables it
    pub processing_delay_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_WORKER_COUNT,
            processing_delay_ms: 0,
        }
    }
}

impl WorkerConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

/// `capacity = None` means unbounded
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BookingPolicyConfig {
    pub discipline: Discipline,
    pub max_retries: u32,
}

impl Default for BookingPolicyConfig {
    fn default() -> Self {
        Self {
            discipline: Discipline::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Bounds of the simulated external validation (e.g. payment check)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl ValidationConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub base_ms: u64,
    pub multiplier: f64,
    pub max_ms: u64,
    pub jitter_enabled: bool,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: 0,
            multiplier: 2.0,
            max_ms: 1_000,
            jitter_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    pub timeout_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
        }
    }
}

impl ShutdownConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl BookingConfig {
    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.registry.total_seats == 0 {
            return Err(ConfigurationError::invalid_value(
                "registry.total_seats",
                0,
                "registry must hold at least one seat",
            ));
        }

        if self.workers.count == 0 {
            return Err(ConfigurationError::invalid_value(
                "workers.count",
                0,
                "worker pool must have at least one worker",
            ));
        }

        if self.queue.capacity == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "queue.capacity",
                0,
                "bounded queue capacity must be greater than 0",
            ));
        }

        if self.validation.min_delay_ms > self.validation.max_delay_ms {
            return Err(ConfigurationError::invalid_value(
                "validation.min_delay_ms",
                self.validation.min_delay_ms,
                format!(
                    "must not exceed validation.max_delay_ms ({})",
                    self.validation.max_delay_ms
                ),
            ));
        }

        if !self.backoff.multiplier.is_finite() || self.backoff.multiplier < 1.0 {
            return Err(ConfigurationError::invalid_value(
                "backoff.multiplier",
                self.backoff.multiplier,
                "multiplier must be a finite number >= 1.0",
            ));
        }

        if self.shutdown.timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "shutdown.timeout_ms",
                0,
                "shutdown timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Configuration suited to tests: no delays, a small registry
    pub fn for_testing(total_seats: u32, workers: usize) -> Self {
        let mut config = Self::default();
        config.registry.total_seats = total_seats;
        config.workers.count = workers;
        config.shutdown.timeout_ms = 5_000;
        config
    }
}
