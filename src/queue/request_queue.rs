//! FIFO of pending booking requests shared by producers and workers.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::error::{BookingError, BookingResult};
use crate::models::{BookingRequest, SeatId};

#[derive(Debug)]
struct QueueState {
    items: VecDeque<BookingRequest>,
    closed: bool,
    next_sequence: u64,
}

/// Concurrency-safe, optionally bounded FIFO with one-way close.
///
/// Sequence numbers are assigned under the same lock that appends the
/// request, so they match dequeue order exactly.
#[derive(Debug)]
pub struct RequestQueue {
    state: Mutex<QueueState>,
    capacity: Option<usize>,
    not_empty: Notify,
    not_full: Notify,
}

impl RequestQueue {
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn bounded(capacity: usize) -> BookingResult<Self> {
        if capacity == 0 {
            return Err(BookingError::InvalidParameter(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self::new(Some(capacity)))
    }

    fn new(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
                next_sequence: 1,
            }),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    /// Append a request without waiting. Returns its sequence number.
    ///
    /// Fails with `QueueClosed` after [`close`](Self::close) and with
    /// `QueueFull` when a bounded queue is at capacity.
    pub fn try_enqueue(&self, requester: impl Into<String>, seat_id: SeatId) -> BookingResult<u64> {
        let sequence = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(BookingError::QueueClosed);
            }
            if let Some(capacity) = self.capacity {
                if state.items.len() >= capacity {
                    return Err(BookingError::QueueFull { capacity });
                }
            }

            let sequence = state.next_sequence;
            state.next_sequence += 1;
            state
                .items
                .push_back(BookingRequest::new(requester.into(), seat_id, sequence));
            sequence
        };

        debug!(seat_id, sequence, "Request enqueued");
        self.not_empty.notify_one();
        Ok(sequence)
    }

    /// Append a request, waiting for room on a full bounded queue
    pub async fn enqueue(&self, requester: impl Into<String>, seat_id: SeatId) -> BookingResult<u64> {
        let requester = requester.into();
        loop {
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            // Register before checking so a dequeue between check and await is not missed
            notified.as_mut().enable();

            match self.try_enqueue(requester.as_str(), seat_id) {
                Err(BookingError::QueueFull { .. }) => notified.await,
                result => return result,
            }
        }
    }

    /// Next request in submission order.
    ///
    /// Waits while the queue is open and empty. Returns `None` once the
    /// queue is closed and fully drained.
    pub async fn dequeue(&self) -> Option<BookingRequest> {
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(request) = state.items.pop_front() {
                    drop(state);
                    self.not_full.notify_one();
                    return Some(request);
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Stop accepting requests and wake every waiter. Idempotent.
    pub fn close(&self) {
        let pending = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.items.len()
        };

        info!(pending, "📪 QUEUE: Closed to new requests");
        self.not_empty.notify_waiters();
        self.not_full.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::unbounded()
    }
}
