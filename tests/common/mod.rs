//! Shared helpers for booking integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Barrier;

use seat_booking::models::BookingOutcome;
use seat_booking::registry::ValidationDelay;
use seat_booking::{BookingConfig, BookingCoordinator, BookingStatus, Discipline, SeatId, SeatRegistry};

/// Validation window that releases only once `n` optimistic readers are inside it.
///
/// Forces every contender to read the seat as available before any of them
/// can commit.
#[derive(Debug)]
pub struct BarrierValidator {
    barrier: Barrier,
}

impl BarrierValidator {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Barrier::new(n),
        }
    }
}

#[async_trait]
impl ValidationDelay for BarrierValidator {
    async fn validate(&self, _seat_id: SeatId) {
        self.barrier.wait().await;
    }

    fn name(&self) -> &'static str {
        "barrier"
    }
}

/// Coordinator with no delays, `workers` workers and the given discipline
pub fn coordinator(total_seats: u32, workers: usize, discipline: Discipline) -> BookingCoordinator {
    let mut config = BookingConfig::for_testing(total_seats, workers);
    config.booking.discipline = discipline;
    BookingCoordinator::new(config).expect("test configuration is valid")
}

/// Optimistic coordinator whose validation window waits for `contenders` readers
pub fn barrier_coordinator(
    total_seats: u32,
    contenders: usize,
    max_retries: u32,
) -> BookingCoordinator {
    let mut config = BookingConfig::for_testing(total_seats, contenders);
    config.booking.discipline = Discipline::Optimistic;
    config.booking.max_retries = max_retries;

    let registry = SeatRegistry::new(total_seats)
        .expect("registry size is valid")
        .with_validator(Arc::new(BarrierValidator::new(contenders)));

    BookingCoordinator::with_registry(config, registry).expect("test configuration is valid")
}

pub fn count_by_status(outcomes: &[BookingOutcome]) -> HashMap<BookingStatus, usize> {
    let mut counts = HashMap::new();
    for outcome in outcomes {
        *counts.entry(outcome.status).or_insert(0) += 1;
    }
    counts
}

pub fn booked_per_seat(outcomes: &[BookingOutcome]) -> HashMap<SeatId, usize> {
    let mut counts = HashMap::new();
    for outcome in outcomes.iter().filter(|o| o.status == BookingStatus::Booked) {
        *counts.entry(outcome.request.seat_id).or_insert(0) += 1;
    }
    counts
}
