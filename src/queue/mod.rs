//! # Request Queue
//!
//! Producers submit [`BookingRequest`](crate::models::BookingRequest)s from any
//! thread; booking workers consume them in submission order.

pub mod request_queue;

pub use request_queue::RequestQueue;
