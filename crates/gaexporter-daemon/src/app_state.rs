//! Shared application state for the exporter.
//!
//! Built once at startup and cloned into the HTTP handlers and the scheduler.
//! Every configured metric gets its scalar series here, so a bad metric name
//! fails startup instead of the first poll.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gaexporter_core::error::Result;

use crate::collect::{Collector, DimensionResolver};
use crate::config::ExporterConfig;
use crate::obs::{ExporterMetrics, MetricRegistry};
use crate::source::DataSource;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<MetricRegistry>,
    metrics: Arc<ExporterMetrics>,
    collector: Arc<Collector>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    ticks: AtomicU64,
}

impl AppState {
    pub fn new(cfg: ExporterConfig, source: Arc<dyn DataSource>) -> Result<Self> {
        let registry = Arc::new(MetricRegistry::new());
        for metric in &cfg.metrics {
            registry.register_scalar(metric)?;
        }

        let metrics = Arc::new(ExporterMetrics::default());
        let collector = Arc::new(Collector::new(
            source,
            Arc::clone(&registry),
            DimensionResolver::new(&cfg.dimensions),
            Arc::clone(&metrics),
            cfg.viewid.clone(),
        ));

        tracing::info!(metrics = cfg.metrics.len(), view = %cfg.viewid, "scalar series registered");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                ticks: AtomicU64::new(0),
            }),
            registry,
            metrics,
            collector,
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }

    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }

    /// Record that a poll tick has been dispatched.
    pub fn mark_tick(&self) {
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.inner.ticks.load(Ordering::Relaxed)
    }

    /// Ready once the first tick has been dispatched.
    pub fn is_ready(&self) -> bool {
        self.ticks() > 0
    }

    /// Full scrape body: realtime series followed by exporter self-metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.registry.render(&mut out);
        self.metrics.render(&mut out);
        out
    }
}
