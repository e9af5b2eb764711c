//! Booking requests as they travel through the [`RequestQueue`](crate::queue::RequestQueue).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::seat::SeatId;

/// An immutable request for one seat
///
/// The `sequence` is assigned by the queue at enqueue time. It records
/// submission order for diagnostics and plays no part in correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Identity of the user asking for the seat
    pub requester: String,
    /// Target seat
    pub seat_id: SeatId,
    /// Monotonic submission sequence, starting at 1
    pub sequence: u64,
    /// When the request was accepted by the queue
    pub submitted_at: DateTime<Utc>,
}

impl BookingRequest {
    pub(crate) fn new(requester: String, seat_id: SeatId, sequence: u64) -> Self {
        Self {
            requester,
            seat_id,
            sequence,
            submitted_at: Utc::now(),
        }
    }
}
