//! # Booking Coordinator Module
//!
//! The [`BookingCoordinator`] is the engine's public face. It owns the seat
//! registry, the request queue, the outcome sink and the worker pool, and it
//! controls worker lifecycle, discipline selection and drain-on-shutdown.
//!
//! ## Key Components
//!
//! - [`BookingCoordinator`] - Initialization, submission, lifecycle and queries
//! - [`pool`] - Worker spawning, state tracking and joining

pub mod pool;


use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::constants::Discipline;
use crate::error::{BookingError, BookingResult};
use crate::logging::log_lifecycle_event;
use crate::metrics::{MetricsSnapshot, OutcomeSink};
use crate::models::{BookingOutcome, SeatId, SeatStatus};
use crate::queue::RequestQueue;
use crate::registry::SeatRegistry;
use crate::strategy::DisciplineSwitch;
use crate::worker::{WorkerContext, WorkerState};

use self::pool::WorkerPool;

/// Orchestrates the booking engine
///
/// Requests may be submitted from any thread. Workers started with
/// [`start_workers`](Self::start_workers) consume them until
/// [`shutdown`](Self::shutdown) closes the queue and drains it.
#[derive(Debug)]
pub struct BookingCoordinator {
    /// Unique identifier for this coordinator instance
    id: Uuid,
    config: BookingConfig,
    registry: Arc<SeatRegistry>,
    queue: Arc<RequestQueue>,
    sink: Arc<OutcomeSink>,
    discipline: DisciplineSwitch,
    pool: WorkerPool,
    /// Whether workers have been started and not yet shut down
    running: AtomicBool,
    /// Serializes concurrent shutdown calls
    shutdown_lock: Mutex<()>,
    /// Held while workers are spawned or the queue is closed, so neither
    /// can interleave with the other
    lifecycle: parking_lot::Mutex<()>,
}

impl BookingCoordinator {
    /// Create a coordinator from a validated configuration
    pub fn new(config: BookingConfig) -> BookingResult<Self> {
        config.validate()?;
        let registry = SeatRegistry::from_config(&config)?;
        Self::with_registry(config, registry)
    }

    /// Create a coordinator with default settings and `total_seats` available seats
    pub fn initialize(total_seats: u32) -> BookingResult<Self> {
        let mut config = BookingConfig::default();
        config.registry.total_seats = total_seats;
        Self::new(config)
    }

    /// Create a coordinator around a registry built by the caller.
    ///
    /// The registry's size wins over `config.registry.total_seats`.
    pub fn with_registry(config: BookingConfig, registry: SeatRegistry) -> BookingResult<Self> {
        config.validate()?;
        let id = Uuid::new_v4();

        let queue = match config.queue.capacity {
            Some(capacity) => RequestQueue::bounded(capacity)?,
            None => RequestQueue::unbounded(),
        };

        info!(
            coordinator_id = %id,
            total_seats = registry.total_seats(),
            discipline = %config.booking.discipline,
            max_retries = config.booking.max_retries,
            "🏗️ COORDINATOR: Creating BookingCoordinator"
        );

        Ok(Self {
            id,
            discipline: DisciplineSwitch::new(config.booking.discipline, config.booking.max_retries),
            registry: Arc::new(registry),
            queue: Arc::new(queue),
            sink: Arc::new(OutcomeSink::new()),
            pool: WorkerPool::new(),
            running: AtomicBool::new(false),
            shutdown_lock: Mutex::new(()),
            lifecycle: parking_lot::Mutex::new(()),
            config,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SeatRegistry> {
        &self.registry
    }

    /// Submit a request from any thread without waiting.
    ///
    /// Invalid seat ids are rejected here and never reach the queue.
    pub fn enqueue(&self, requester: impl Into<String>, seat_id: SeatId) -> BookingResult<u64> {
        self.registry.validate_seat_id(seat_id)?;
        self.queue.try_enqueue(requester, seat_id)
    }

    /// Submit a request, waiting for room when the queue is bounded and full
    pub async fn enqueue_wait(
        &self,
        requester: impl Into<String>,
        seat_id: SeatId,
    ) -> BookingResult<u64> {
        self.registry.validate_seat_id(seat_id)?;
        self.queue.enqueue(requester, seat_id).await
    }

    /// Switch the discipline for requests dequeued from now on.
    ///
    /// Returns the previous discipline. In-flight requests keep the one
    /// they started with.
    pub fn set_discipline(&self, discipline: Discipline) -> Discipline {
        let previous = self.discipline.set(discipline);
        if previous != discipline {
            log_lifecycle_event("coordinator", "discipline_changed", Some(discipline), None);
        }
        previous
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline.current()
    }

    /// Start the configured number of workers
    pub fn start(&self) -> BookingResult<()> {
        self.start_workers(self.config.workers.count)
    }

    /// Start `count` workers against the shared registry and queue
    #[instrument(skip(self), fields(coordinator_id = %self.id))]
    pub fn start_workers(&self, count: usize) -> BookingResult<()> {
        let _lifecycle = self.lifecycle.lock();
        if self.queue.is_closed() {
            return Err(BookingError::InvalidState(
                "Coordinator has been shut down".to_string(),
            ));
        }
        self.spawn_workers_locked(count)
    }

    /// Close the queue, let workers drain it, and wait for them to exit.
    ///
    /// Pending requests are always processed: if no workers were ever
    /// started, the configured number is started just to drain. Idempotent;
    /// fails with `Timeout` if workers outlive `shutdown.timeout_ms`.
    #[instrument(skip(self), fields(coordinator_id = %self.id))]
    pub async fn shutdown(&self) -> BookingResult<()> {
        let _guard = self.shutdown_lock.lock().await;

        if self.queue.is_closed() && self.pool.active_workers() == 0 {
            debug!("COORDINATOR: Already shut down");
            return Ok(());
        }

        {
            let _lifecycle = self.lifecycle.lock();
            self.queue.close();
            info!("🛑 COORDINATOR: Shutting down, draining {} queued requests", self.queue.len());

            // The queue is closed, so this emptiness check is final
            if !self.running.load(Ordering::Acquire) && !self.queue.is_empty() {
                warn!("COORDINATOR: Requests pending with no workers, starting workers to drain");
                self.spawn_workers_locked(self.config.workers.count)?;
            }
        }

        self.pool.join_all(self.config.shutdown.timeout()).await?;
        self.running.store(false, Ordering::Release);

        let metrics = self.metrics_snapshot();
        log_lifecycle_event(
            "coordinator",
            "shutdown_complete",
            Some(self.discipline()),
            Some(&format!(
                "{} outcomes, {} booked",
                metrics.attempts, metrics.successes
            )),
        );
        info!("✅ COORDINATOR: BookingCoordinator stopped successfully");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Point-in-time `(seat id, status)` pairs, ordered by id
    pub fn snapshot(&self) -> Vec<(SeatId, SeatStatus)> {
        self.registry.snapshot()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.sink.snapshot()
    }

    /// Every outcome recorded so far, in completion order
    pub fn outcomes(&self) -> Vec<BookingOutcome> {
        self.sink.outcomes()
    }

    /// Live feed of outcomes recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<BookingOutcome> {
        self.sink.subscribe()
    }

    /// Get coordinator status
    pub fn status(&self) -> CoordinatorStatus {
        CoordinatorStatus {
            coordinator_id: self.id,
            running: self.is_running(),
            discipline: self.discipline(),
            total_seats: self.registry.total_seats(),
            available_seats: self.registry.available_count(),
            queue_depth: self.queue.len(),
            queue_closed: self.queue.is_closed(),
            active_workers: self.pool.active_workers(),
            workers: self.pool.worker_states(),
            metrics: self.metrics_snapshot(),
        }
    }

    /// Spawn workers; the caller holds `lifecycle`
    fn spawn_workers_locked(&self, count: usize) -> BookingResult<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BookingError::InvalidState(
                "Workers are already running".to_string(),
            ));
        }

        info!("🚀 COORDINATOR: Starting {} booking workers", count);

        if let Err(e) = self.pool.spawn_workers(count, &self.worker_context()) {
            self.running.store(false, Ordering::Release);
            return Err(e);
        }

        log_lifecycle_event(
            "coordinator",
            "workers_started",
            Some(self.discipline()),
            Some(&format!("{count} workers")),
        );
        info!("🎉 COORDINATOR: Booking workers started successfully");
        Ok(())
    }

    fn worker_context(&self) -> WorkerContext {
        WorkerContext {
            registry: Arc::clone(&self.registry),
            queue: Arc::clone(&self.queue),
            sink: Arc::clone(&self.sink),
            discipline: self.discipline.clone(),
            processing_delay: self.config.workers.processing_delay(),
        }
    }
}

/// Status information for the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorStatus {
    pub coordinator_id: Uuid,
    pub running: bool,
    pub discipline: Discipline,
    pub total_seats: u32,
    pub available_seats: usize,
    pub queue_depth: usize,
    pub queue_closed: bool,
    pub active_workers: usize,
    pub workers: Vec<WorkerState>,
    pub metrics: MetricsSnapshot,
}
