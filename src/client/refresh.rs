//! Background refresh loop.
//!
//! # Responsibilities
//! - Run one fetch-and-apply cycle before the first wait
//! - Re-fetch every tracked namespace on a fixed cadence
//! - Contain fetch failures: log them and try again next cycle
//!
//! # Design Decisions
//! - The interval is measured from the end of one cycle to the start of the
//!   next, so slow fetches stretch the period instead of overlapping cycles
//! - No backoff and no cycle limit: best effort, forever
//! - Shutdown is only observed between cycles; an in-flight cycle finishes

use std::time::Instant;

use tokio::sync::broadcast;
use tokio::time;

use crate::client::RemoteConfigClient;
use crate::observability::metrics;

/// Counts from one completed refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Namespaces whose cached document was replaced.
    pub replaced: usize,
    /// Namespaces whose document matched the cached fingerprint.
    pub unchanged: usize,
    /// Namespaces the server had no data for.
    pub absent: usize,
}

/// Long-lived task keeping one client's cache fresh.
pub struct RefreshLoop {
    client: RemoteConfigClient,
    namespaces: Vec<String>,
}

impl RefreshLoop {
    /// Duplicate namespaces are dropped, first occurrence wins.
    pub fn new(client: RemoteConfigClient, namespaces: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(namespaces.len());
        for ns in namespaces {
            if !unique.contains(&ns) {
                unique.push(ns);
            }
        }

        Self {
            client,
            namespaces: unique,
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Populate the cache if nothing has been fetched yet.
    pub async fn prime(&self) {
        if self.namespaces.is_empty() {
            return;
        }

        let started = Instant::now();

        match self.client.prime_if_empty(&self.namespaces).await {
            Ok(Some(report)) => {
                metrics::record_cycle("ok", started);
                tracing::info!(
                    replaced = report.replaced,
                    absent = report.absent,
                    "Initial configuration loaded"
                );
            }
            Ok(None) => {}
            Err(e) => {
                metrics::record_cycle("aborted", started);
                tracing::error!(
                    namespace = %e.namespace(),
                    error = %e,
                    "Initial configuration fetch failed; continuing without configuration"
                );
            }
        }
    }

    /// One refresh cycle with failures logged.
    pub async fn tick(&self) {
        let started = Instant::now();

        match self.client.refresh(&self.namespaces).await {
            Ok(report) => {
                metrics::record_cycle("ok", started);
                if report.replaced > 0 {
                    tracing::info!(
                        replaced = report.replaced,
                        unchanged = report.unchanged,
                        absent = report.absent,
                        "Configuration updated"
                    );
                } else {
                    tracing::debug!(
                        unchanged = report.unchanged,
                        absent = report.absent,
                        "Configuration unchanged"
                    );
                }
            }
            Err(e) => {
                metrics::record_cycle("aborted", started);
                tracing::warn!(
                    namespace = %e.namespace(),
                    error = %e,
                    "Refresh cycle aborted; keeping cached configuration"
                );
            }
        }
    }

    /// Prime, then run until the shutdown signal fires.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) {
        self.prime().await;
        self.run_after_prime(shutdown).await;
    }

    /// Run until the shutdown signal fires, starting with a full interval.
    ///
    /// For callers that already awaited [`RefreshLoop::prime`].
    pub async fn run_after_prime(self, mut shutdown: broadcast::Receiver<()>) {
        if self.namespaces.is_empty() {
            tracing::warn!("No namespaces configured, refresh loop idle");
            let _ = shutdown.recv().await;
            return;
        }

        let config = self.client.config();
        let interval = config.refresh_interval();

        tracing::info!(
            app_id = %config.app_id,
            env = %config.env,
            cluster = %config.cluster,
            namespaces = ?self.namespaces,
            interval_secs = config.refresh_interval_secs,
            "Refresh loop starting"
        );

        loop {
            tokio::select! {
                _ = time::sleep(interval) => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Refresh loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
