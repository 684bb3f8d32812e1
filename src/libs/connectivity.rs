//! Connectivity monitor.
//!
//! Probes the tracker server on a fixed interval and tracks the resulting
//! online flag. An offline-to-online edge triggers a queue drain once; a
//! second, independent timer drains unconditionally while online as a safety
//! net against missed edges. The monitor only decides *when* to drain; retry
//! policy belongs to [`ActionQueue`].

use crate::api::Gateway;
use crate::libs::messages::Message;
use crate::libs::queue::ActionQueue;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use parking_lot::Mutex;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct ConnectivityMonitor<G: Gateway> {
    gateway: Rc<G>,
    queue: Arc<ActionQueue>,
    online: AtomicBool,
    probe_interval: Duration,
    drain_interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<G: Gateway + 'static> ConnectivityMonitor<G> {
    pub fn new(gateway: Rc<G>, queue: Arc<ActionQueue>, probe_interval_secs: u64, drain_interval_secs: u64) -> Rc<Self> {
        Rc::new(Self {
            gateway,
            queue,
            online: AtomicBool::new(false),
            probe_interval: Duration::from_secs(probe_interval_secs),
            drain_interval: Duration::from_secs(drain_interval_secs),
            handle: Mutex::new(None),
        })
    }

    /// Runs the probe and safety-drain timers until [`stop`](Self::stop).
    pub fn start(self: &Rc<Self>) {
        let monitor = Rc::clone(self);
        let handle = tokio::task::spawn_local(async move {
            let mut probe = tokio::time::interval(monitor.probe_interval);
            probe.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut drain = tokio::time::interval(monitor.drain_interval);
            drain.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = probe.tick() => {
                        monitor.probe_once().await;
                    }
                    _ = drain.tick() => {
                        if monitor.is_online() {
                            monitor.drain_queue().await;
                        }
                    }
                }
            }
        });

        if let Some(previous) = self.handle.lock().replace(handle) {
            previous.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn queue_size(&self) -> Result<usize> {
        self.queue.size()
    }

    /// One probe cycle: pings the remote, records the flag and drains once
    /// on the offline-to-online edge.
    pub async fn probe_once(&self) -> bool {
        let now_online = self.gateway.ping().await;
        let was_online = self.online.swap(now_online, Ordering::Relaxed);
        if now_online && !was_online {
            msg_debug!(Message::ConnectivityOnline);
            self.drain_queue().await;
        } else if !now_online && was_online {
            msg_debug!(Message::ConnectivityOffline);
        }
        now_online
    }

    async fn drain_queue(&self) {
        if let Err(err) = self.queue.drain(self.gateway.as_ref()).await {
            msg_warning!(Message::QueueDrainFailed(err.to_string()));
        }
    }
}
