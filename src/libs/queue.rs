//! Durable action queue.
//!
//! Wraps the sqlite-backed [`ActionQueueStore`] with the retry and drain
//! policy: actions are applied oldest-first, a failed action has its retry
//! count bumped and stays queued, and an action that exhausts its retry
//! budget is dropped so one poisoned record cannot block the queue forever.
//!
//! Draining is single-flight. A drain works over a snapshot of the queue
//! taken at entry; actions enqueued while a drain runs are picked up by the
//! next cycle.

use crate::api::Gateway;
use crate::db::queue::ActionQueueStore;
use crate::libs::action::{ActionPayload, QueuedAction};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of one drain cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Actions applied remotely and deleted from the store.
    pub applied: usize,
    /// Actions that failed and remain queued with a bumped retry count.
    pub retried: usize,
    /// Actions evicted after exhausting their retry budget.
    pub dropped: usize,
}

/// Retry/drain policy over the persistent action store.
pub struct ActionQueue {
    store: ActionQueueStore,
    max_retries: u32,
    drain_gate: Mutex<()>,
    dropped_total: AtomicU64,
}

impl ActionQueue {
    pub fn new(store: ActionQueueStore, max_retries: u32) -> Arc<Self> {
        Arc::new(Self {
            store,
            max_retries,
            drain_gate: Mutex::new(()),
            dropped_total: AtomicU64::new(0),
        })
    }

    /// Persists an action for later application. Returns its queue id.
    pub fn enqueue(&self, payload: &ActionPayload) -> Result<i64> {
        let id = self.store.insert(payload, self.max_retries)?;
        msg_debug!(Message::QueueActionEnqueued(payload.kind().to_string()));
        Ok(id)
    }

    pub fn size(&self) -> Result<usize> {
        self.store.count()
    }

    pub fn snapshot(&self) -> Result<Vec<QueuedAction>> {
        self.store.snapshot()
    }

    pub fn clear(&self) -> Result<usize> {
        self.store.clear()
    }

    /// Actions dropped since process start, over all drain cycles.
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total.load(Ordering::Relaxed)
    }

    /// Applies every queued action oldest-first.
    ///
    /// Concurrent callers do not stack: if a drain is already running the
    /// call returns immediately with an empty report. A remote failure bumps
    /// the action's retry count and moves on to the next action, so one
    /// rejected record never blocks the rest of the queue.
    pub async fn drain<G: Gateway>(&self, gateway: &G) -> Result<DrainReport> {
        let Ok(_guard) = self.drain_gate.try_lock() else {
            msg_debug!(Message::QueueDrainSkipped);
            return Ok(DrainReport::default());
        };

        let snapshot = self.store.snapshot()?;
        if snapshot.is_empty() {
            return Ok(DrainReport::default());
        }
        msg_debug!(Message::QueueDrainStarted(snapshot.len()));

        let mut report = DrainReport::default();
        for action in snapshot {
            match self.apply(gateway, &action).await {
                Ok(()) => {
                    self.store.delete(action.id)?;
                    report.applied += 1;
                    msg_debug!(Message::QueueActionApplied(action.id));
                }
                Err(err) => {
                    let next = action.retry_count + 1;
                    if next >= action.max_retries {
                        self.store.delete(action.id)?;
                        self.dropped_total.fetch_add(1, Ordering::Relaxed);
                        report.dropped += 1;
                        msg_warning!(Message::QueueActionDropped(action.id, action.max_retries));
                        msg_debug!(Message::ApiRequestFailed(err.to_string()));
                    } else {
                        // Stays queued; this cycle moves on rather than
                        // busy-looping against a possibly down remote.
                        self.store.set_retry_count(action.id, next)?;
                        report.retried += 1;
                        msg_debug!(Message::QueueActionRetryScheduled(action.id, next, action.max_retries));
                    }
                }
            }
        }

        msg_debug!(Message::QueueDrainFinished(report.applied, report.retried, report.dropped));
        Ok(report)
    }

    async fn apply<G: Gateway>(&self, gateway: &G, action: &QueuedAction) -> Result<()> {
        match &action.payload {
            ActionPayload::Screenshot(shot) => gateway.upload_screenshot(shot).await?,
            ActionPayload::TimeEntryCreate(create) => {
                let net = crate::libs::network::NetIdentity {
                    ip: create.ip.clone(),
                    mac: create.mac.clone(),
                };
                gateway.create_session(create.task_id, &net).await?;
            }
            ActionPayload::TimeEntryUpdate(update) => {
                gateway.stop_session(update.session_id).await?;
            }
        }
        Ok(())
    }
}
