#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Seat Booking Engine
//!
//! Concurrent seat-booking engine where many booking attempts race for a
//! finite pool of seats, with no seat ever booked twice.
//!
//! ## Overview
//!
//! Requests are submitted to a FIFO [`queue::RequestQueue`] from any thread.
//! A pool of [`worker::BookingWorker`]s pulls them concurrently and books each
//! against the [`registry::SeatRegistry`] under the active [`Discipline`]:
//!
//! - **Pessimistic**: take the seat's exclusive lock, check, transition, release.
//! - **Optimistic**: read without exclusive access, run a validation window,
//!   then commit only if the seat's version is unchanged. Failed revalidations
//!   are retried up to `max_retries` times.
//!
//! Every request yields exactly one [`models::BookingOutcome`], recorded in the
//! [`metrics::OutcomeSink`] with lock-free aggregate counters.
//!
//! ## Module Organization
//!
//! - [`registry`] - Seat state, per-seat locks and both booking disciplines
//! - [`queue`] - Concurrency-safe FIFO of pending requests
//! - [`strategy`] - Discipline strategies and the runtime discipline switch
//! - [`worker`] - Booking workers and their observable state
//! - [`metrics`] - Outcome sink and aggregate metrics
//! - [`coordinator`] - Engine lifecycle: start, submit, switch, drain
//! - [`config`] - Layered TOML and environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup and standard records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seat_booking::{BookingCoordinator, Discipline};
//!
//! # async fn example() -> seat_booking::BookingResult<()> {
//! let coordinator = BookingCoordinator::initialize(40)?;
//! coordinator.set_discipline(Discipline::Pessimistic);
//! coordinator.start_workers(8)?;
//!
//! coordinator.enqueue("alice", 12)?;
//! coordinator.enqueue("bob", 12)?;
//!
//! coordinator.shutdown().await?;
//! println!("{:?}", coordinator.metrics_snapshot());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod queue;
pub mod registry;
pub mod strategy;
pub mod worker;

pub use config::{BookingConfig, ConfigManager, ConfigurationError};
pub use constants::Discipline;
pub use coordinator::{BookingCoordinator, CoordinatorStatus};
pub use error::{BookingError, BookingResult};
pub use metrics::{MetricsSnapshot, OutcomeSink};
pub use models::{BookingOutcome, BookingRequest, BookingStatus, Seat, SeatId, SeatStatus};
pub use queue::RequestQueue;
pub use registry::SeatRegistry;
