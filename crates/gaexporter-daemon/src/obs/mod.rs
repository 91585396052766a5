//! In-process metrics.
//!
//! `registry` holds the exported realtime gauges; `metrics` holds counters about
//! the exporter itself. Both are rendered by the `/metrics` handler.

pub mod metrics;
pub mod registry;

pub use metrics::ExporterMetrics;
pub use registry::{MetricRegistry, ScalarHandle, VectorHandle};
