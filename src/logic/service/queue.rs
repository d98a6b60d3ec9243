//! Event Queue - bounded, drop-oldest
//!
//! Producers (platform callbacks, the source pump) never block.
//! One async consumer (the worker) waits on `pop`.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queue was full; the oldest item was discarded
    DroppedOldest,
    /// Queue closed; item discarded
    Closed,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

pub struct EventQueue<T> {
    state: Mutex<QueueState<T>>,
    notify: Notify,
    capacity: usize,
}

impl<T> EventQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            notify: Notify::new(),
            capacity,
        }
    }

    pub fn push(&self, item: T) -> PushOutcome {
        let outcome = {
            let mut state = self.state.lock();
            if state.closed {
                return PushOutcome::Closed;
            }

            let mut outcome = PushOutcome::Queued;
            while state.items.len() >= self.capacity {
                state.items.pop_front();
                outcome = PushOutcome::DroppedOldest;
            }
            state.items.push_back(item);
            outcome
        };

        self.notify.notify_one();
        outcome
    }

    /// Next item; `None` once closed and drained
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Reject new items; queued items are still delivered
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_one();
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

    pub fn status(&self) -> QueueStatus {
        let state = self.state.lock();
        QueueStatus {
            current_size: state.items.len(),
            capacity: self.capacity,
            is_closed: state.closed,
            fill_percent: (state.items.len() as f32 / self.capacity as f32 * 100.0).min(100.0),
        }
    }
}

/// Queue status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub is_closed: bool,
    pub fill_percent: f32,
}
