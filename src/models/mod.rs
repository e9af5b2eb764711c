//! # Booking Data Model
//!
//! Value types that flow between the queue, the workers and the registry.
//!
//! - [`Seat`] - a seat's identity, status and optimistic version counter
//! - [`BookingRequest`] - an immutable request stamped with its queue sequence
//! - [`BookingOutcome`] - the single terminal result recorded for each request

pub mod booking_outcome;
pub mod booking_request;
pub mod seat;

pub use booking_outcome::{BookingAttempt, BookingOutcome, BookingStatus};
pub use booking_request::BookingRequest;
pub use seat::{Seat, SeatId, SeatStatus};
