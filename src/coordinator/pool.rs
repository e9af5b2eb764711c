//! # Worker Pool Management
//!
//! Spawns booking workers, tracks their reported state and joins them on
//! shutdown.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::error::{BookingError, BookingResult};
use crate::worker::{BookingWorker, WorkerContext, WorkerState, WorkerStates, WorkerStatus};

/// The set of running booking workers
#[derive(Debug, Default)]
pub struct WorkerPool {
    states: WorkerStates,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self {
            states: Arc::new(DashMap::new()),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn `count` workers sharing `context`
    #[instrument(skip(self, context))]
    pub fn spawn_workers(&self, count: usize, context: &WorkerContext) -> BookingResult<()> {
        if count == 0 {
            return Err(BookingError::InvalidParameter(
                "worker count must be at least 1".to_string(),
            ));
        }

        let mut handles = self.handles.lock();
        let first_index = self.states.len() + 1;

        info!("🏊 POOL: Spawning {} booking workers", count);

        for index in first_index..first_index + count {
            let worker = BookingWorker::new(index, context.clone(), Arc::clone(&self.states));
            handles.push(worker.spawn());
        }

        info!("✅ POOL: {} workers running", handles.len());
        Ok(())
    }

    /// Wait for every spawned worker to exit.
    ///
    /// Workers only exit once the queue is closed and drained, so callers
    /// close the queue first. On timeout the unfinished handles are kept and
    /// a later call may wait for them again.
    #[instrument(skip(self))]
    pub async fn join_all(&self, timeout: Duration) -> BookingResult<()> {
        let mut handles = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() {
            return Ok(());
        }

        info!("🛑 POOL: Waiting for {} workers to finish", handles.len());

        let joined = tokio::time::timeout(
            timeout,
            futures::future::join_all(handles.iter_mut()),
        )
        .await;

        match joined {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        error!(error = %e, "❌ POOL: Worker task failed");
                    }
                }
                info!("✅ POOL: All workers stopped");
                Ok(())
            }
            Err(_) => {
                let remaining = handles.iter().filter(|handle| !handle.is_finished()).count();
                warn!(remaining, "⚠️ POOL: Workers did not finish within {:?}", timeout);
                handles.retain(|handle| !handle.is_finished());
                self.handles.lock().extend(handles);
                Err(BookingError::Timeout(format!(
                    "{remaining} workers still running after {timeout:?}"
                )))
            }
        }
    }

    /// Workers spawned and not yet stopped
    pub fn active_workers(&self) -> usize {
        self.states
            .iter()
            .filter(|entry| entry.status != WorkerStatus::Stopped)
            .count()
    }

    pub fn total_workers(&self) -> usize {
        self.states.len()
    }

    /// Every worker's reported state, ordered by pool index
    pub fn worker_states(&self) -> Vec<WorkerState> {
        let mut states: Vec<_> = self.states.iter().map(|entry| entry.value().clone()).collect();
        states.sort_by_key(|state| state.index);
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Discipline;
    use crate::metrics::OutcomeSink;
    use crate::queue::RequestQueue;
    use crate::registry::SeatRegistry;
    use crate::strategy::DisciplineSwitch;

    fn context() -> WorkerContext {
        WorkerContext {
            registry: Arc::new(SeatRegistry::new(4).unwrap()),
            queue: Arc::new(RequestQueue::unbounded()),
            sink: Arc::new(OutcomeSink::new()),
            discipline: DisciplineSwitch::new(Discipline::Pessimistic, 0),
            processing_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_pool_spawns_and_joins() {
        let context = context();
        let pool = WorkerPool::new();

        pool.spawn_workers(3, &context).unwrap();
        assert_eq!(pool.total_workers(), 3);

        for seat_id in 1..=4 {
            context.queue.try_enqueue(format!("user-{seat_id}"), seat_id).unwrap();
        }
        context.queue.close();

        pool.join_all(Duration::from_secs(5)).await.unwrap();

        assert_eq!(pool.active_workers(), 0);
        let states = pool.worker_states();
        assert_eq!(
            states.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(states.iter().map(|s| s.processed).sum::<u64>(), 4);
    }

    #[tokio::test]
    async fn test_join_times_out_while_queue_open() {
        let context = context();
        let pool = WorkerPool::new();
        pool.spawn_workers(1, &context).unwrap();

        let result = pool.join_all(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(BookingError::Timeout(_))));

        context.queue.close();
        pool.join_all(Duration::from_secs(5)).await.unwrap();
        assert_eq!(pool.active_workers(), 0);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let pool = WorkerPool::new();
        assert!(matches!(
            pool.spawn_workers(0, &context()),
            Err(BookingError::InvalidParameter(_))
        ));
    }
}
