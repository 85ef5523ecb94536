//! Scheduler port backed by tokio timers.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{CancelHandle, Scheduler, TimerToken};

/// Delivers each token over a channel once its delay has elapsed
///
/// Tokens arrive on the receiver returned by [`TokioScheduler::new`] in firing order.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerToken>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_handle: u64,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
                next_handle: 0,
            },
            rx,
        )
    }

    /// Timers scheduled and not yet fired or cancelled
    pub fn in_flight(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration, token: TimerToken) -> CancelHandle {
        self.tasks.retain(|_, t| !t.is_finished());

        self.next_handle += 1;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token);
        });
        self.tasks.insert(self.next_handle, task);
        CancelHandle(self.next_handle)
    }

    fn cancel(&mut self, handle: CancelHandle) {
        if let Some(task) = self.tasks.remove(&handle.0) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
