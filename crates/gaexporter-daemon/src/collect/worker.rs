use std::sync::Arc;
use std::time::Instant;

use gaexporter_core::error::Result;
use gaexporter_core::naming::sanitize;
use gaexporter_core::query::{parse_value, vector_row, RowSkip, Shape};

use crate::collect::DimensionResolver;
use crate::obs::{ExporterMetrics, MetricRegistry};
use crate::source::DataSource;

/// What one run wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Gauge writes (scalar or vector cells).
    pub updates: usize,
    /// Rows that produced no write.
    pub dropped: usize,
    /// Writes whose cell did not parse and were stored as `0`.
    pub coerced: usize,
}

/// Fetch-and-update worker: one fetch for one metric, results written to the registry.
pub struct Collector {
    source: Arc<dyn DataSource>,
    registry: Arc<MetricRegistry>,
    dimensions: DimensionResolver,
    metrics: Arc<ExporterMetrics>,
    view_id: String,
}

impl Collector {
    pub fn new(
        source: Arc<dyn DataSource>,
        registry: Arc<MetricRegistry>,
        dimensions: DimensionResolver,
        metrics: Arc<ExporterMetrics>,
        view_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            registry,
            dimensions,
            metrics,
            view_id: view_id.into(),
        }
    }

    pub async fn run(&self, metric: &str) -> Result<RunSummary> {
        let dims = self.dimensions.dimensions_for(metric);
        let dims = (!dims.is_empty()).then_some(dims);

        let started = Instant::now();
        let fetched = self.source.fetch(&self.view_id, metric, dims).await;
        self.metrics
            .fetch_duration
            .observe(&[("metric", metric)], started.elapsed());
        self.metrics.fetches.inc(&[("metric", metric)]);
        let result = fetched?;

        tracing::debug!(metric = %metric, rows = result.rows.len(), "realtime rows fetched");

        let mut summary = RunSummary::default();
        match result.shape() {
            Shape::Scalar(cell) => {
                let handle = self.registry.register_scalar(metric)?;
                let value = self.parse(metric, cell, &mut summary);
                handle.set(value);
                summary.updates += 1;
            }
            Shape::Vector(rows) => {
                for row in rows {
                    let r = match vector_row(row) {
                        Ok(r) => r,
                        Err(skip) => {
                            if skip == RowSkip::Short {
                                tracing::warn!(metric = %metric, cells = row.len(), "row too short for vector data");
                            }
                            self.metrics
                                .rows_dropped
                                .inc(&[("metric", metric), ("reason", skip.as_str())]);
                            summary.dropped += 1;
                            continue;
                        }
                    };

                    let derived = sanitize(r.dimension);
                    let handle = self.registry.register_vector(&derived)?;
                    let value = self.parse(metric, r.value, &mut summary);
                    handle.set(r.category, value);
                    summary.updates += 1;
                }
            }
        }
        Ok(summary)
    }

    fn parse(&self, metric: &str, cell: &str, summary: &mut RunSummary) -> f64 {
        let (value, coerced) = parse_value(cell);
        if coerced {
            self.metrics.value_coerced.inc(&[("metric", metric)]);
            summary.coerced += 1;
        }
        value
    }
}
