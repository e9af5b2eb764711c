//! Error types for the booking engine.
//!
//! Only caller-usage problems surface as errors. A lost race for a seat is an
//! ordinary [`BookingStatus`](crate::models::BookingStatus), never a `BookingError`.

use crate::config::ConfigurationError;
use crate::models::SeatId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Invalid seat id {seat_id}: registry holds seats 1..={total_seats}")]
    InvalidSeat { seat_id: SeatId, total_seats: u32 },
    #[error("Request queue is closed; no further requests are accepted")]
    QueueClosed,
    #[error("Request queue is full (capacity: {capacity})")]
    QueueFull { capacity: usize },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Timeout error: {0}")]
    Timeout(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_seat_message_names_range() {
        let err = BookingError::InvalidSeat {
            seat_id: 41,
            total_seats: 40,
        };
        assert_eq!(
            err.to_string(),
            "Invalid seat id 41: registry holds seats 1..=40"
        );
    }
}
