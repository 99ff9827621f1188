//! Background keep-alive loop: periodic liveness probes for all sessions.
//!
//! One long-lived Tokio task, started once when the server comes up.  On a
//! fixed interval it sends an empty-payload ping frame to every session in
//! the registry.  It never touches the device store.
//!
//! Cancellation is cooperative: [`KeepAlive::shutdown`] signals the task via
//! a watch channel, awaits its termination, and then closes every remaining
//! registered session as the final scoped-teardown step.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::infrastructure::registry::SessionRegistry;

/// Handle to the running keep-alive task.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) leaves
/// the task running until the runtime itself stops.
pub struct KeepAlive {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    registry: Arc<SessionRegistry>,
}

impl KeepAlive {
    /// Spawns the keep-alive loop, probing all sessions every `period`.
    pub fn spawn(registry: Arc<SessionRegistry>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task_registry = Arc::clone(&registry);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick resolves immediately; skip it so probes start
            // one full period after bring-up.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("keep-alive tick: probing all sessions");
                        task_registry.ping_all().await;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("keep-alive loop received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            task,
            registry,
        }
    }

    /// Stops the loop, awaits its termination, then closes every remaining
    /// registered session.
    pub async fn shutdown(self) {
        // The receiver is gone only if the task already exited; either way
        // the await below observes a finished task.
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;

        self.registry.close_all().await;
        info!("keep-alive loop stopped; all sessions closed");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
