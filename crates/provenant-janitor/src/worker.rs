//! Background worker for continuous Janitor operation

use crate::{Janitor, JanitorConfig, JanitorError, JanitorMetrics};
use provenant_domain::traits::GraphAudit;
use std::fmt::Display;
use std::future::Future;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Background worker that runs Janitor on a schedule
///
/// The first sweep runs immediately, then one per configured interval.
/// A failed sweep is logged and the worker keeps going.
///
/// # Examples
///
/// ```no_run
/// use provenant_janitor::{JanitorConfig, JanitorWorker};
/// use provenant_store::SqliteStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("provenant.db")?;
///     let mut worker = JanitorWorker::new(JanitorConfig::default());
///
///     // Run until Ctrl+C
///     worker.run(store).await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        let interval = config.sweep_interval();
        Self {
            janitor: Janitor::new(config),
            interval,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Emit events under the given span
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.janitor = self.janitor.with_span(span);
        self
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    pub async fn run<S>(&mut self, store: S) -> Result<S, JanitorError>
    where
        S: GraphAudit,
        S::Error: Display,
    {
        let shutdown = async {
            tokio::signal::ctrl_c()
                .await
                .map_err(|e| JanitorError::Worker(format!("failed to listen for Ctrl+C: {e}")))
        };
        self.run_until(store, shutdown).await
    }

    /// Run the worker until `shutdown` completes, then hand the store back
    ///
    /// An error from `shutdown` stops the worker and is returned.
    pub async fn run_until<S, F>(&mut self, store: S, shutdown: F) -> Result<S, JanitorError>
    where
        S: GraphAudit,
        S::Error: Display,
        F: Future<Output = Result<(), JanitorError>>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(interval = ?self.interval, "janitor worker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("starting sweep cycle");
                    // Failures are logged and counted by the janitor
                    let _ = self.janitor.sweep(&store);
                }
                signal = &mut shutdown => {
                    tracing::info!("shutdown signal received, stopping janitor");
                    signal?;
                    break;
                }
            }
        }

        tracing::info!("janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
        Ok(store)
    }

    /// Run for a specific number of cycles (useful for testing)
    ///
    /// Unlike [`JanitorWorker::run`], the first failed sweep stops the worker.
    pub async fn run_cycles<S>(&mut self, store: S, cycles: usize) -> Result<S, JanitorError>
    where
        S: GraphAudit,
        S::Error: Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(cycles, interval = ?self.interval, "janitor worker started");

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("starting sweep cycle {}/{}", cycle + 1, cycles);
            let report = self.janitor.sweep(&store)?;
            tracing::debug!(
                "sweep {}/{} completed: {} findings",
                cycle + 1,
                cycles,
                report.total_findings()
            );
        }

        tracing::info!(
            "janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
        Ok(store)
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}
