//! A single booking worker: dequeue, book, record, repeat until drained.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::logging::{log_booking_outcome, log_error};
use crate::metrics::OutcomeSink;
use crate::models::{BookingOutcome, BookingRequest, SeatId};
use crate::queue::RequestQueue;
use crate::registry::SeatRegistry;
use crate::strategy::DisciplineSwitch;

/// What a worker is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Waiting on the queue
    Idle,
    /// Booking a dequeued request
    Processing,
    /// Saw the queue closed and drained, and exited
    Stopped,
}

/// Observable state of one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerState {
    pub worker_id: Uuid,
    /// Position in the pool, from 1
    pub index: usize,
    pub status: WorkerStatus,
    pub processed: u64,
    pub current_seat: Option<SeatId>,
    pub started_at: DateTime<Utc>,
}

/// Shared board every worker reports its [`WorkerState`] to
pub type WorkerStates = Arc<DashMap<Uuid, WorkerState>>;

/// Everything a worker shares with its siblings
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub registry: Arc<SeatRegistry>,
    pub queue: Arc<RequestQueue>,
    pub sink: Arc<OutcomeSink>,
    pub discipline: DisciplineSwitch,
    /// Pause after each processed request; zero skips it
    pub processing_delay: Duration,
}

/// Pulls requests until the queue reports closed and empty.
///
/// Workers never talk to each other. All coordination goes through the
/// registry's per-seat locks and the queue's FIFO.
#[derive(Debug)]
pub struct BookingWorker {
    id: Uuid,
    index: usize,
    context: WorkerContext,
    states: WorkerStates,
}

impl BookingWorker {
    pub fn new(index: usize, context: WorkerContext, states: WorkerStates) -> Self {
        let id = Uuid::new_v4();
        states.insert(
            id,
            WorkerState {
                worker_id: id,
                index,
                status: WorkerStatus::Idle,
                processed: 0,
                current_seat: None,
                started_at: Utc::now(),
            },
        );

        Self {
            id,
            index,
            context,
            states,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run the worker on the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    #[instrument(skip(self), fields(worker_id = %self.id, index = self.index))]
    pub async fn run(self) {
        info!("👷 WORKER: Started");

        while let Some(request) = self.context.queue.dequeue().await {
            self.update_state(WorkerStatus::Processing, Some(request.seat_id), false);

            let outcome = self.process(request).await;
            log_booking_outcome(&self.id.to_string(), &outcome);
            self.context.sink.record(outcome);

            self.update_state(WorkerStatus::Idle, None, true);

            if !self.context.processing_delay.is_zero() {
                tokio::time::sleep(self.context.processing_delay).await;
            }
        }

        self.update_state(WorkerStatus::Stopped, None, false);
        info!("🛑 WORKER: Queue closed and drained, exiting");
    }

    /// Book one request under the discipline in force at dequeue time
    async fn process(&self, request: BookingRequest) -> BookingOutcome {
        let strategy = self.context.discipline.strategy();
        let discipline = strategy.discipline();

        debug!(
            seat_id = request.seat_id,
            sequence = request.sequence,
            %discipline,
            "Processing booking request"
        );

        match strategy.book(&self.context.registry, request.seat_id).await {
            Ok(attempt) => BookingOutcome::from_attempt(request, discipline, attempt),
            Err(e) => {
                log_error(
                    "booking_worker",
                    "book",
                    &e.to_string(),
                    Some(request.requester.as_str()),
                );
                BookingOutcome::rejected(request, discipline)
            }
        }
    }

    fn update_state(&self, status: WorkerStatus, current_seat: Option<SeatId>, completed: bool) {
        if let Some(mut state) = self.states.get_mut(&self.id) {
            state.status = status;
            state.current_seat = current_seat;
            if completed {
                state.processed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Discipline;
    use crate::models::BookingStatus;

    fn context(total_seats: u32, discipline: Discipline) -> WorkerContext {
        WorkerContext {
            registry: Arc::new(SeatRegistry::new(total_seats).unwrap()),
            queue: Arc::new(RequestQueue::unbounded()),
            sink: Arc::new(OutcomeSink::new()),
            discipline: DisciplineSwitch::new(discipline, 2),
            processing_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_worker_drains_queue_and_stops() {
        let context = context(3, Discipline::Pessimistic);
        let states: WorkerStates = Arc::new(DashMap::new());

        context.queue.try_enqueue("alice", 1).unwrap();
        context.queue.try_enqueue("bob", 1).unwrap();
        context.queue.try_enqueue("carol", 2).unwrap();
        context.queue.close();

        let worker = BookingWorker::new(1, context.clone(), Arc::clone(&states));
        let worker_id = worker.id();
        worker.spawn().await.unwrap();

        let statuses: Vec<_> = context.sink.outcomes().iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                BookingStatus::Booked,
                BookingStatus::AlreadyBooked,
                BookingStatus::Booked
            ]
        );

        let state = states.get(&worker_id).unwrap();
        assert_eq!(state.status, WorkerStatus::Stopped);
        assert_eq!(state.processed, 3);
        assert!(context.queue.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_seat_becomes_rejected_outcome() {
        let context = context(2, Discipline::Optimistic);
        let states: WorkerStates = Arc::new(DashMap::new());

        context.queue.try_enqueue("mallory", 99).unwrap();
        context.queue.close();

        BookingWorker::new(1, context.clone(), states).run().await;

        let outcomes = context.sink.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, BookingStatus::Rejected);
        assert_eq!(outcomes[0].discipline, Discipline::Optimistic);
        assert_eq!(context.registry.available_count(), 2);
    }

    #[tokio::test]
    async fn test_discipline_read_per_request() {
        let context = context(2, Discipline::Pessimistic);
        let states: WorkerStates = Arc::new(DashMap::new());

        context.queue.try_enqueue("alice", 1).unwrap();
        context.discipline.set(Discipline::Optimistic);
        context.queue.try_enqueue("bob", 2).unwrap();
        context.queue.close();

        BookingWorker::new(1, context.clone(), states).run().await;

        // Switch happened before either dequeue
        assert!(context
            .sink
            .outcomes()
            .iter()
            .all(|o| o.discipline == Discipline::Optimistic));
    }
}
