//! Terminal results of booking requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::booking_request::BookingRequest;
use crate::constants::Discipline;

/// Final status of a single booking request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// The request won the seat
    Booked,
    /// Another request held the seat when this one looked
    AlreadyBooked,
    /// Optimistic revalidation kept failing until retries ran out
    Conflict,
    /// The seat id was rejected when the request was dequeued
    Rejected,
}

impl BookingStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, BookingStatus::Booked)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Booked => "booked",
            BookingStatus::AlreadyBooked => "already_booked",
            BookingStatus::Conflict => "conflict",
            BookingStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// What the registry reports for one booking operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAttempt {
    pub status: BookingStatus,
    /// Retry cycles consumed after the first attempt
    pub retries: u32,
    /// Failed revalidations observed along the way
    pub conflicts: u32,
}

impl BookingAttempt {
    pub(crate) fn immediate(status: BookingStatus) -> Self {
        Self {
            status,
            retries: 0,
            conflicts: 0,
        }
    }
}

/// Immutable record of how a request ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub request: BookingRequest,
    pub status: BookingStatus,
    pub retries: u32,
    pub conflicts: u32,
    pub discipline: Discipline,
    pub completed_at: DateTime<Utc>,
}

impl BookingOutcome {
    pub fn from_attempt(
        request: BookingRequest,
        discipline: Discipline,
        attempt: BookingAttempt,
    ) -> Self {
        Self {
            request,
            status: attempt.status,
            retries: attempt.retries,
            conflicts: attempt.conflicts,
            discipline,
            completed_at: Utc::now(),
        }
    }

    pub fn rejected(request: BookingRequest, discipline: Discipline) -> Self {
        Self::from_attempt(
            request,
            discipline,
            BookingAttempt::immediate(BookingStatus::Rejected),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_echoes_request_and_attempt() {
        let request = BookingRequest::new("alice".to_string(), 3, 9);
        let attempt = BookingAttempt {
            status: BookingStatus::Conflict,
            retries: 2,
            conflicts: 3,
        };

        let outcome = BookingOutcome::from_attempt(request.clone(), Discipline::Optimistic, attempt);

        assert_eq!(outcome.request, request);
        assert_eq!(outcome.status, BookingStatus::Conflict);
        assert_eq!(outcome.retries, 2);
        assert_eq!(outcome.conflicts, 3);
        assert!(!outcome.status.is_success());
    }

    #[test]
    fn test_rejected_outcome_has_no_retries() {
        let request = BookingRequest::new("bob".to_string(), 99, 1);
        let outcome = BookingOutcome::rejected(request, Discipline::Pessimistic);
        assert_eq!(outcome.status, BookingStatus::Rejected);
        assert_eq!(outcome.retries, 0);
        assert_eq!(outcome.status.to_string(), "rejected");
    }
}
