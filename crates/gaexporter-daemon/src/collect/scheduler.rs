use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use gaexporter_core::error::{ExporterError, Result};

use crate::app_state::AppState;
use crate::config::{FetchErrorPolicy, OverlapPolicy};

/// Poll loop: every `interval`, spawn one worker per configured metric.
///
/// Workers are never awaited. With [`OverlapPolicy::Allow`] a slow fetch can
/// overlap the next tick's fetch of the same metric; [`OverlapPolicy::Skip`]
/// skips a metric whose previous run is still in flight.
pub struct Scheduler {
    state: AppState,
    metrics: Arc<[String]>,
    interval: Duration,
    overlap: OverlapPolicy,
    on_error: FetchErrorPolicy,
    in_flight: Arc<DashSet<String>>,
    fatal_tx: mpsc::UnboundedSender<ExporterError>,
    fatal_rx: mpsc::UnboundedReceiver<ExporterError>,
}

// Clears the in-flight mark when the worker task ends, including on panic.
struct InFlightGuard {
    set: Arc<DashSet<String>>,
    metric: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.metric);
    }
}

impl Scheduler {
    pub fn new(state: AppState) -> Self {
        let cfg = state.cfg();
        let metrics: Arc<[String]> = cfg.metrics.clone().into();
        let interval = Duration::from_secs(cfg.interval);
        let overlap = cfg.overlap;
        let on_error = cfg.on_fetch_error;
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

        Self {
            state,
            metrics,
            interval,
            overlap,
            on_error,
            in_flight: Arc::new(DashSet::new()),
            fatal_tx,
            fatal_rx,
        }
    }

    /// Dispatch one worker per metric and return immediately.
    pub fn tick(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.metrics.len());

        for metric in self.metrics.iter() {
            let guard = match self.overlap {
                OverlapPolicy::Allow => None,
                OverlapPolicy::Skip => {
                    if !self.in_flight.insert(metric.clone()) {
                        tracing::debug!(metric = %metric, "previous run still in flight, skipping");
                        self.state
                            .metrics()
                            .overlap_skips
                            .inc(&[("metric", metric.as_str())]);
                        continue;
                    }
                    Some(InFlightGuard {
                        set: Arc::clone(&self.in_flight),
                        metric: metric.clone(),
                    })
                }
            };

            let state = self.state.clone();
            let metric = metric.clone();
            let on_error = self.on_error;
            let fatal_tx = self.fatal_tx.clone();

            handles.push(tokio::spawn(async move {
                let _guard = guard;
                let err = match state.collector().run(&metric).await {
                    Ok(summary) => {
                        tracing::debug!(metric = %metric, ?summary, "metric collected");
                        return;
                    }
                    Err(e) => e,
                };

                state
                    .metrics()
                    .worker_errors
                    .inc(&[("metric", metric.as_str()), ("code", err.code())]);
                match on_error {
                    FetchErrorPolicy::Skip => {
                        tracing::warn!(metric = %metric, error = %err, "collection failed, skipping this tick");
                    }
                    FetchErrorPolicy::Exit => {
                        tracing::error!(metric = %metric, error = %err, "collection failed");
                        let _ = fatal_tx.send(err);
                    }
                }
            }));
        }

        self.state.mark_tick();
        handles
    }

    /// Poll until a worker reports a fatal error. Under
    /// [`FetchErrorPolicy::Skip`] this never returns.
    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            metrics = self.metrics.len(),
            overlap = ?self.overlap,
            on_fetch_error = ?self.on_error,
            "polling started"
        );
        loop {
            self.tick();
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                Some(err) = self.fatal_rx.recv() => return Err(err),
            }
        }
    }
}
