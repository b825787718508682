use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::CryptoTracker;

/// Production re-poll cadence for market snapshots.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Cancellable periodic refresh task.
///
/// Fires immediately on start, then once per period. Each tick reserves
/// a fetch ticket and performs the network round trip WITHOUT holding
/// the tracker lock, so a manual `refresh()` can run concurrently — the
/// ticket sequence decides which response wins. The task is owned by
/// this handle: `stop()` or dropping it aborts the task, so no timer
/// outlives its controller.
pub struct RefreshScheduler {
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the polling task on the current tokio runtime.
    pub fn start(tracker: Arc<Mutex<CryptoTracker>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A slow fetch must not cause a burst of catch-up ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;

                let (ticket, provider) = {
                    let mut tracker = tracker.lock().await;
                    (tracker.issue_fetch_ticket(), tracker.provider())
                };

                match provider.fetch_snapshot().await {
                    Ok(assets) => {
                        let mut tracker = tracker.lock().await;
                        if tracker.apply_snapshot(ticket, assets) {
                            debug!("scheduled refresh applied");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "scheduled refresh failed; keeping previous snapshot");
                        tracker.lock().await.record_fetch_failure(ticket);
                    }
                }
            }
        });
        Self { handle }
    }

    /// Spawn with the production 60-second cadence.
    pub fn start_default(tracker: Arc<Mutex<CryptoTracker>>) -> Self {
        Self::start(tracker, DEFAULT_REFRESH_PERIOD)
    }

    /// Cancel the polling task. Safe to call more than once; dropping
    /// the scheduler has the same effect.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the polling task has terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
