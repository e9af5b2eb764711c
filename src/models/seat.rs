//! Seat state owned by the [`SeatRegistry`](crate::registry::SeatRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat identity, unique within a registry and numbered from 1
pub type SeatId = u32;

/// Availability of a single seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[default]
    Available,
    Booked,
}

impl SeatStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, SeatStatus::Available)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatStatus::Available => f.write_str("available"),
            SeatStatus::Booked => f.write_str("booked"),
        }
    }
}

/// A seat as seen by the registry
///
/// `version` is bumped exactly once per successful Available -> Booked
/// transition and is what optimistic commits compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub status: SeatStatus,
    pub version: u64,
}

impl Seat {
    /// A new seat: available, version 0
    pub fn new(id: SeatId) -> Self {
        Self {
            id,
            status: SeatStatus::Available,
            version: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Transition to booked and bump the version.
    ///
    /// Returns `false` and leaves the seat untouched if it was already booked.
    pub(crate) fn mark_booked(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.status = SeatStatus::Booked;
        self.version += 1;
        true
    }
}
