//! # System Constants
//!
//! Defaults and the concurrency-control discipline enum shared by the
//! registry, the workers and the configuration layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of seats in a freshly configured registry
pub const DEFAULT_TOTAL_SEATS: u32 = 40;

/// Default worker pool size
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default number of optimistic retry cycles after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default upper bound for a graceful shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 30_000;

/// Capacity of the outcome broadcast channel handed to display subscribers
pub const OUTCOME_CHANNEL_CAPACITY: usize = 1024;

/// Concurrency-control discipline applied by workers when booking a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// Lock the seat, check, transition, unlock
    Pessimistic = 0,
    /// Read without exclusive access, validate, then compare-and-swap commit
    #[default]
    Optimistic = 1,
}

impl Discipline {
    pub fn name(&self) -> &'static str {
        match self {
            Discipline::Pessimistic => "pessimistic",
            Discipline::Optimistic => "optimistic",
        }
    }
}

impl From<u8> for Discipline {
    fn from(value: u8) -> Self {
        match value {
            0 => Discipline::Pessimistic,
            _ => Discipline::Optimistic,
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Discipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(Discipline::Pessimistic),
            "optimistic" => Ok(Discipline::Optimistic),
            other => Err(format!(
                "unknown discipline '{other}', expected 'pessimistic' or 'optimistic'"
            )),
        }
    }
}
