//! # Booking Strategies
//!
//! Workers book through a [`BookingStrategy`] chosen per request from the
//! current [`Discipline`]. The active discipline lives in a [`DisciplineSwitch`]
//! so it can be flipped at runtime without locking.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::constants::Discipline;
use crate::error::BookingResult;
use crate::models::{BookingAttempt, SeatId};
use crate::registry::SeatRegistry;

/// One way of turning a request for a seat into a registry operation
#[async_trait]
pub trait BookingStrategy: Send + Sync {
    fn discipline(&self) -> Discipline;

    async fn book(&self, registry: &SeatRegistry, seat_id: SeatId)
        -> BookingResult<BookingAttempt>;
}

/// Lock, check, transition, unlock
#[derive(Debug, Default, Clone, Copy)]
pub struct PessimisticStrategy;

#[async_trait]
impl BookingStrategy for PessimisticStrategy {
    fn discipline(&self) -> Discipline {
        Discipline::Pessimistic
    }

    async fn book(
        &self,
        registry: &SeatRegistry,
        seat_id: SeatId,
    ) -> BookingResult<BookingAttempt> {
        registry.book_pessimistic(seat_id)
    }
}

/// Read, validate, compare-and-swap with bounded retries
#[derive(Debug, Clone, Copy)]
pub struct OptimisticStrategy {
    pub max_retries: u32,
}

impl OptimisticStrategy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

#[async_trait]
impl BookingStrategy for OptimisticStrategy {
    fn discipline(&self) -> Discipline {
        Discipline::Optimistic
    }

    async fn book(
        &self,
        registry: &SeatRegistry,
        seat_id: SeatId,
    ) -> BookingResult<BookingAttempt> {
        registry.book_optimistic(seat_id, self.max_retries).await
    }
}

/// Shared, atomically switchable discipline with both strategies preloaded
#[derive(Clone)]
pub struct DisciplineSwitch {
    current: Arc<AtomicU8>,
    pessimistic: Arc<dyn BookingStrategy>,
    optimistic: Arc<dyn BookingStrategy>,
}

impl std::fmt::Debug for DisciplineSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisciplineSwitch")
            .field("current", &self.current())
            .finish()
    }
}

impl DisciplineSwitch {
    pub fn new(initial: Discipline, max_retries: u32) -> Self {
        Self {
            current: Arc::new(AtomicU8::new(initial as u8)),
            pessimistic: Arc::new(PessimisticStrategy),
            optimistic: Arc::new(OptimisticStrategy::new(max_retries)),
        }
    }

    pub fn current(&self) -> Discipline {
        Discipline::from(self.current.load(Ordering::Acquire))
    }

    /// Switch the discipline; returns the previous one.
    ///
    /// Only requests dequeued after the switch observe the new discipline.
    pub fn set(&self, discipline: Discipline) -> Discipline {
        let previous = Discipline::from(self.current.swap(discipline as u8, Ordering::AcqRel));
        if previous != discipline {
            info!(from = %previous, to = %discipline, "🔀 Booking discipline switched");
        }
        previous
    }

    /// Strategy for the discipline in force right now
    pub fn strategy(&self) -> Arc<dyn BookingStrategy> {
        match self.current() {
            Discipline::Pessimistic => Arc::clone(&self.pessimistic),
            Discipline::Optimistic => Arc::clone(&self.optimistic),
        }
    }
}
