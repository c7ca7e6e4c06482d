//! Cancellable periodic polling of an access request's status.
//!
//! The portal's grant workflow is pull-based: a client asks "has my request
//! state changed?" on a fixed cadence until a terminal state appears. This
//! module packages that loop as an owned task that stops itself on the first
//! terminal observation or when its owner signals shutdown, instead of an
//! uncancellable interval.
//!
//! The HTTP API serves each poll as a one-shot status read; [`StatusPoller`]
//! is library surface for embedding clients (kiosk displays, CLI tooling)
//! that drive the cadence themselves against any [`RequestStatusProbe`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use portal_core::AppResult;
use portal_domain::{AccessCode, RequestStatusView};
use tokio::sync::watch;
use tracing::warn;

/// Cadence between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Port answering a single status question for a code.
#[async_trait]
pub trait RequestStatusProbe: Send + Sync {
    /// Returns the current status view for the request behind `code`.
    async fn check(&self, code: &AccessCode) -> AppResult<RequestStatusView>;
}

/// Periodic status poller with cooperative shutdown.
#[derive(Clone)]
pub struct StatusPoller {
    probe: Arc<dyn RequestStatusProbe>,
    interval: Duration,
}

impl StatusPoller {
    /// Creates a poller with the default 2-second cadence.
    #[must_use]
    pub fn new(probe: Arc<dyn RequestStatusProbe>) -> Self {
        Self {
            probe,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the polling cadence.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Polls until a terminal state is observed or shutdown is signalled.
    ///
    /// Returns the terminal view, or `None` when the owner tore the poller
    /// down first. Probe errors are treated as "no change yet": the loop
    /// logs and keeps polling, bounded only by the shutdown signal.
    pub async fn run(
        &self,
        code: AccessCode,
        mut shutdown: watch::Receiver<bool>,
    ) -> AppResult<Option<RequestStatusView>> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so the cadence starts
        // one interval after the request was submitted.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.probe.check(&code).await {
                        Ok(view) if view.is_terminal() => return Ok(Some(view)),
                        Ok(_) => {}
                        Err(error) => {
                            warn!(%code, %error, "status poll failed; will retry");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(None);
                    }
                }
            }
        }
    }
}
