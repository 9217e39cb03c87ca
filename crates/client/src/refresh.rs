//! Background token refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::session::{RefreshOutcome, SessionStore};

/// Default exchange cadence: every ten minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Recurring task that exchanges the refresh token ahead of access-token
/// expiry.
///
/// One exchange per tick, no retry within a cycle: a failed exchange tears
/// the session down rather than leaving a soon-to-expire access token in
/// place. The loop stops on shutdown or once the session has ended.
pub struct RefreshWorker {
    store: SessionStore,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl RefreshWorker {
    pub fn new(store: SessionStore) -> Self {
        Self::with_interval(store, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn with_interval(store: SessionStore, interval: Duration) -> Self {
        Self {
            store,
            interval,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawn the loop.
    ///
    /// The first exchange happens one full interval after start, never
    /// immediately — a fresh login already holds a fresh access token.
    pub fn start(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let shutdown = self.shutdown.clone();
        let period = self.interval;

        tokio::spawn(async move {
            tracing::debug!(interval_secs = period.as_secs(), "refresh loop started");

            let first_tick = tokio::time::Instant::now() + period;
            let mut ticks = tokio::time::interval_at(first_tick, period);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::debug!("refresh loop received shutdown signal");
                        break;
                    }
                    _ = ticks.tick() => {
                        match store.refresh_once().await {
                            RefreshOutcome::Refreshed => {}
                            RefreshOutcome::NoSession => {
                                tracing::trace!("nothing to refresh");
                            }
                            RefreshOutcome::Superseded => {
                                tracing::debug!("refresh superseded by a session change");
                            }
                            RefreshOutcome::SessionEnded => {
                                tracing::info!("session ended after failed refresh, stopping loop");
                                break;
                            }
                        }
                    }
                }
            }

            tracing::debug!("refresh loop stopped");
        })
    }

    /// Request the loop to stop. Idempotent; a shutdown requested before
    /// `start` is observed by the first iteration.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
