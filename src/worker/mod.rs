//! # Booking Workers
//!
//! Concurrent consumers of the [`RequestQueue`](crate::queue::RequestQueue)
//! that apply the active discipline against the
//! [`SeatRegistry`](crate::registry::SeatRegistry).

pub mod booking_worker;

pub use booking_worker::{BookingWorker, WorkerContext, WorkerState, WorkerStates, WorkerStatus};
