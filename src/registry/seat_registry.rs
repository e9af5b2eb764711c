//! # SeatRegistry
//!
//! Owns every [`Seat`] and implements both booking disciplines against them.
//! No other component mutates seat state.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};
use crate::models::{BookingAttempt, BookingStatus, Seat, SeatId, SeatStatus};

use super::backoff::RetryBackoff;
use super::validation::{self, NoValidationDelay, ValidationDelay};

/// Per-seat locked store of seat state
#[derive(Debug)]
pub struct SeatRegistry {
    /// `seats[i]` holds seat `i + 1`
    seats: Vec<RwLock<Seat>>,
    /// Validation window run between optimistic read and commit
    validator: Arc<dyn ValidationDelay>,
    /// Pause between optimistic retry cycles
    backoff: RetryBackoff,
}

impl SeatRegistry {
    /// Create a registry with seats `1..=total_seats`, all available at version 0
    pub fn new(total_seats: u32) -> BookingResult<Self> {
        if total_seats == 0 {
            return Err(BookingError::InvalidParameter(
                "registry must hold at least one seat".to_string(),
            ));
        }

        let seats = (1..=total_seats).map(|id| RwLock::new(Seat::new(id))).collect();

        debug!(total_seats, "Seat registry initialized");

        Ok(Self {
            seats,
            validator: Arc::new(NoValidationDelay),
            backoff: RetryBackoff::none(),
        })
    }

    /// Build a registry sized and tuned from configuration
    pub fn from_config(config: &BookingConfig) -> BookingResult<Self> {
        Ok(Self::new(config.registry.total_seats)?
            .with_validator(validation::from_config(&config.validation))
            .with_backoff(RetryBackoff::from_config(&config.backoff)))
    }

    pub fn with_validator(mut self, validator: Arc<dyn ValidationDelay>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_backoff(mut self, backoff: RetryBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn total_seats(&self) -> u32 {
        self.seats.len() as u32
    }

    /// Fail with [`BookingError::InvalidSeat`] unless `seat_id` is in `1..=total_seats`
    pub fn validate_seat_id(&self, seat_id: SeatId) -> BookingResult<()> {
        self.slot(seat_id).map(|_| ())
    }

    fn slot(&self, seat_id: SeatId) -> BookingResult<&RwLock<Seat>> {
        seat_id
            .checked_sub(1)
            .and_then(|index| self.seats.get(index as usize))
            .ok_or(BookingError::InvalidSeat {
                seat_id,
                total_seats: self.total_seats(),
            })
    }

    /// Book under exclusive access for the whole check-and-transition.
    ///
    /// Never retries: once the write lock is held the observed status is final.
    #[instrument(level = "trace", skip(self))]
    pub fn book_pessimistic(&self, seat_id: SeatId) -> BookingResult<BookingAttempt> {
        let slot = self.slot(seat_id)?;

        let booked = slot.write().mark_booked();

        let status = if booked {
            BookingStatus::Booked
        } else {
            BookingStatus::AlreadyBooked
        };
        trace!(seat_id, %status, "Pessimistic booking finished");

        Ok(BookingAttempt::immediate(status))
    }

    /// Book with an optimistic read, a validation window and a versioned commit.
    ///
    /// Runs at most `max_retries + 1` read-validate-commit cycles. Only the
    /// very first read may yield `AlreadyBooked`; once a cycle has failed,
    /// every later failure counts as a conflict and exhausting the retries
    /// yields `Conflict`.
    #[instrument(level = "trace", skip(self))]
    pub async fn book_optimistic(
        &self,
        seat_id: SeatId,
        max_retries: u32,
    ) -> BookingResult<BookingAttempt> {
        let slot = self.slot(seat_id)?;
        let mut retries = 0;
        let mut conflicts = 0;

        loop {
            let observed = *slot.read();

            if observed.is_available() {
                self.validator.validate(seat_id).await;

                // Compare-and-swap: commit only if nobody moved the version
                let committed = {
                    let mut seat = slot.write();
                    seat.version == observed.version && seat.mark_booked()
                };

                if committed {
                    trace!(seat_id, retries, conflicts, "Optimistic commit succeeded");
                    return Ok(BookingAttempt {
                        status: BookingStatus::Booked,
                        retries,
                        conflicts,
                    });
                }
            } else if retries == 0 && conflicts == 0 {
                return Ok(BookingAttempt::immediate(BookingStatus::AlreadyBooked));
            }

            conflicts += 1;
            trace!(
                seat_id,
                observed_version = observed.version,
                conflicts,
                "Optimistic revalidation failed"
            );

            if retries >= max_retries {
                return Ok(BookingAttempt {
                    status: BookingStatus::Conflict,
                    retries,
                    conflicts,
                });
            }

            retries += 1;
            self.backoff.wait(retries).await;
        }
    }

    /// Current state of one seat
    pub fn seat(&self, seat_id: SeatId) -> BookingResult<Seat> {
        Ok(*self.slot(seat_id)?.read())
    }

    pub fn version(&self, seat_id: SeatId) -> BookingResult<u64> {
        self.seat(seat_id).map(|seat| seat.version)
    }

    /// Point-in-time copy of every seat, ordered by id.
    ///
    /// Read locks are taken in ascending id order and all held until the copy
    /// is complete, so the result is consistent across seats. Bookers wait at
    /// most for the copy itself.
    pub fn seats(&self) -> Vec<Seat> {
        let guards: Vec<_> = self.seats.iter().map(|slot| slot.read()).collect();
        guards.iter().map(|seat| **seat).collect()
    }

    /// Point-in-time `(seat id, status)` pairs, ordered by id
    pub fn snapshot(&self) -> Vec<(SeatId, SeatStatus)> {
        self.seats()
            .into_iter()
            .map(|seat| (seat.id, seat.status))
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.seats().iter().filter(|seat| seat.is_available()).count()
    }
}
