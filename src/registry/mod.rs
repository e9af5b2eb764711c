//! # Seat Registry
//!
//! The single authoritative store of seat state.
//!
//! ## Overview
//!
//! Every seat sits behind its own read/write lock, so bookings for unrelated
//! seats never contend. Two booking disciplines are exposed:
//!
//! - **Pessimistic**: take the seat's write lock, check, transition, release.
//! - **Optimistic**: read under a shared lock, run the (possibly slow)
//!   validation without any lock held, then commit under the write lock only
//!   if the seat's version is unchanged. Failed commits are retried.
//!
//! ## Architecture
//!
//! ```text
//! SeatRegistry
//! ├── seats[0..N]   RwLock<Seat>       (per-seat exclusive access)
//! ├── validator     ValidationDelay    (optimistic validation window)
//! └── backoff       RetryBackoff       (pause between optimistic cycles)
//! ```
//!
//! Each booking touches exactly one seat lock and never waits on another lock
//! while holding it. Snapshots take read locks in ascending seat order.

pub mod backoff;
pub mod seat_registry;
pub mod validation;

pub use backoff::RetryBackoff;
pub use seat_registry::SeatRegistry;
pub use validation::{
    FixedValidationDelay, NoValidationDelay, RandomValidationDelay, ValidationDelay,
};
