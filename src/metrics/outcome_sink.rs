//! Thread-safe accumulator of booking outcomes and their aggregate counters.

use crossbeam::utils::CachePadded;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::trace;

use crate::constants::OUTCOME_CHANNEL_CAPACITY;
use crate::models::{BookingOutcome, BookingStatus};

/// Lock-free counters, each on its own cache line
#[derive(Debug, Default)]
struct BookingCounters {
    attempts: CachePadded<AtomicU64>,
    successes: CachePadded<AtomicU64>,
    already_booked: CachePadded<AtomicU64>,
    conflicts: CachePadded<AtomicU64>,
    exhausted: CachePadded<AtomicU64>,
    rejected: CachePadded<AtomicU64>,
    retries: CachePadded<AtomicU64>,
}

/// Point-in-time copy of the aggregate counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Outcomes recorded
    pub attempts: u64,
    /// Outcomes with status `Booked`
    pub successes: u64,
    /// Outcomes with status `AlreadyBooked`
    pub already_booked: u64,
    /// Failed optimistic revalidations across all requests
    pub conflicts: u64,
    /// Outcomes with status `Conflict`
    pub exhausted: u64,
    /// Outcomes with status `Rejected`
    pub rejected: u64,
    /// Retry cycles consumed across all requests
    pub retries: u64,
}

impl MetricsSnapshot {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    /// Requests that ended without a seat
    pub fn failures(&self) -> u64 {
        self.already_booked + self.exhausted + self.rejected
    }
}

/// Receives exactly one [`BookingOutcome`] per completed request.
///
/// Counters are readable concurrently with writes. Display collaborators
/// either poll [`snapshot`](Self::snapshot) or [`subscribe`](Self::subscribe)
/// to a broadcast feed that never blocks the recording worker.
#[derive(Debug)]
pub struct OutcomeSink {
    counters: BookingCounters,
    history: Mutex<Vec<BookingOutcome>>,
    sender: broadcast::Sender<BookingOutcome>,
}

impl OutcomeSink {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            counters: BookingCounters::default(),
            history: Mutex::new(Vec::new()),
            sender,
        }
    }

    pub fn record(&self, outcome: BookingOutcome) {
        let counters = &self.counters;
        counters.attempts.fetch_add(1, Ordering::Relaxed);
        counters
            .conflicts
            .fetch_add(u64::from(outcome.conflicts), Ordering::Relaxed);
        counters
            .retries
            .fetch_add(u64::from(outcome.retries), Ordering::Relaxed);

        let status_counter = match outcome.status {
            BookingStatus::Booked => &counters.successes,
            BookingStatus::AlreadyBooked => &counters.already_booked,
            BookingStatus::Conflict => &counters.exhausted,
            BookingStatus::Rejected => &counters.rejected,
        };
        status_counter.fetch_add(1, Ordering::Relaxed);

        self.history.lock().push(outcome.clone());

        // No subscribers is fine
        if self.sender.send(outcome).is_err() {
            trace!("No outcome subscribers");
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = &self.counters;
        MetricsSnapshot {
            attempts: counters.attempts.load(Ordering::Relaxed),
            successes: counters.successes.load(Ordering::Relaxed),
            already_booked: counters.already_booked.load(Ordering::Relaxed),
            conflicts: counters.conflicts.load(Ordering::Relaxed),
            exhausted: counters.exhausted.load(Ordering::Relaxed),
            rejected: counters.rejected.load(Ordering::Relaxed),
            retries: counters.retries.load(Ordering::Relaxed),
        }
    }

    /// Every recorded outcome, in completion order
    pub fn outcomes(&self) -> Vec<BookingOutcome> {
        self.history.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.history.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live feed of outcomes recorded after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BookingOutcome> {
        self.sender.subscribe()
    }
}

impl Default for OutcomeSink {
    fn default() -> Self {
        Self::new()
    }
}
