//! Gauge registry for the exported realtime series.
//!
//! Two maps: scalar gauges keyed by metric name, and gauge vectors keyed by
//! derived name. Values live in atomics behind `Arc` handles, so writers never
//! touch the maps after registration and a scrape never waits on a writer.
//! First registration of a name is serialized by a mutex; lookups of an
//! existing name stay on the lock-free path.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use gaexporter_core::error::{ExporterError, Result};
use gaexporter_core::naming::{
    help_text, is_valid_series_name, series_name, CATEGORY_LABEL, JOB_LABEL,
};

use crate::obs::metrics::escape_label;

/// `f64` stored as bits so reads are never torn.
#[derive(Debug, Default)]
struct Gauge {
    bits: AtomicU64,
}

impl Gauge {
    fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[derive(Debug)]
struct ScalarSeries {
    series: String,
    help: String,
    value: Gauge,
}

#[derive(Debug)]
struct VectorSeries {
    series: String,
    help: String,
    values: DashMap<String, Gauge>,
}

/// Handle to a scalar series.
#[derive(Clone, Debug)]
pub struct ScalarHandle(Arc<ScalarSeries>);

impl ScalarHandle {
    /// Overwrite the current value.
    pub fn set(&self, v: f64) {
        self.0.value.set(v);
    }

    pub fn get(&self) -> f64 {
        self.0.value.get()
    }

    pub fn series_name(&self) -> &str {
        &self.0.series
    }
}

/// Handle to a gauge vector keyed by `category`.
#[derive(Clone, Debug)]
pub struct VectorHandle(Arc<VectorSeries>);

impl VectorHandle {
    /// Create-or-update the value for `category`. Last write wins.
    pub fn set(&self, category: &str, v: f64) {
        if let Some(g) = self.0.values.get(category) {
            g.set(v);
            return;
        }
        self.0
            .values
            .entry(category.to_string())
            .or_default()
            .set(v);
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.values.get(category).map(|g| g.get())
    }

    pub fn len(&self) -> usize {
        self.0.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values.is_empty()
    }

    pub fn series_name(&self) -> &str {
        &self.0.series
    }

    /// True when both handles point at the same underlying series.
    pub fn same_series(&self, other: &VectorHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Scalar(String),
    Vector(String),
}

#[derive(Default)]
pub struct MetricRegistry {
    scalars: DashMap<String, ScalarHandle>,
    vectors: DashMap<String, VectorHandle>,
    // exported series name -> registering key
    claimed: DashMap<String, Owner>,
    registration: Mutex<()>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the scalar gauge for `metric`, or return the existing one.
    pub fn register_scalar(&self, metric: &str) -> Result<ScalarHandle> {
        if let Some(h) = self.scalars.get(metric) {
            return Ok(h.clone());
        }

        let _guard = self.registration.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(h) = self.scalars.get(metric) {
            return Ok(h.clone());
        }

        let series = self.claim(Owner::Scalar(metric.to_string()), metric)?;
        let handle = ScalarHandle(Arc::new(ScalarSeries {
            series,
            help: help_text(metric),
            value: Gauge::default(),
        }));
        self.scalars.insert(metric.to_string(), handle.clone());
        tracing::debug!(metric = %metric, series = %handle.series_name(), "scalar series registered");
        Ok(handle)
    }

    pub fn scalar(&self, metric: &str) -> Option<ScalarHandle> {
        self.scalars.get(metric).map(|h| h.clone())
    }

    /// Register the gauge vector for `derived`, or return the existing one.
    /// Safe under concurrent first registration: every caller observes the
    /// same series.
    pub fn register_vector(&self, derived: &str) -> Result<VectorHandle> {
        if let Some(h) = self.vectors.get(derived) {
            return Ok(h.clone());
        }

        let _guard = self.registration.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(h) = self.vectors.get(derived) {
            return Ok(h.clone());
        }

        let series = self.claim(Owner::Vector(derived.to_string()), derived)?;
        let handle = VectorHandle(Arc::new(VectorSeries {
            series,
            help: help_text(derived),
            values: DashMap::new(),
        }));
        self.vectors.insert(derived.to_string(), handle.clone());
        tracing::info!(derived = %derived, series = %handle.series_name(), "vector series registered");
        Ok(handle)
    }

    pub fn vector(&self, derived: &str) -> Option<VectorHandle> {
        self.vectors.get(derived).map(|h| h.clone())
    }

    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }

    // Caller holds the registration lock.
    fn claim(&self, owner: Owner, name: &str) -> Result<String> {
        let series = series_name(name);
        if !is_valid_series_name(&series) {
            return Err(ExporterError::Registration(format!(
                "{name:?} does not map to a valid series name ({series:?})"
            )));
        }
        if let Some(existing) = self.claimed.get(&series) {
            return Err(ExporterError::Registration(format!(
                "series {series} for {owner:?} already registered by {:?}",
                existing.value()
            )));
        }
        self.claimed.insert(series.clone(), owner);
        Ok(series)
    }

    /// Render every series in Prometheus text exposition format, sorted by name.
    pub fn render(&self, out: &mut String) {
        let job = format!("{}=\"{}\"", JOB_LABEL.0, escape_label(JOB_LABEL.1));

        let mut scalars: Vec<ScalarHandle> = self.scalars.iter().map(|r| r.value().clone()).collect();
        scalars.sort_by(|a, b| a.0.series.cmp(&b.0.series));
        for s in scalars {
            let s = &s.0;
            let _ = writeln!(out, "# HELP {} {}", s.series, escape_help(&s.help));
            let _ = writeln!(out, "# TYPE {} gauge", s.series);
            let _ = writeln!(out, "{}{{{}}} {}", s.series, job, fmt_value(s.value.get()));
        }

        let mut vectors: Vec<VectorHandle> = self.vectors.iter().map(|r| r.value().clone()).collect();
        vectors.sort_by(|a, b| a.0.series.cmp(&b.0.series));
        for v in vectors {
            let v = &v.0;
            let mut rows: Vec<(String, f64)> = v
                .values
                .iter()
                .map(|r| (r.key().clone(), r.value().get()))
                .collect();
            if rows.is_empty() {
                continue;
            }
            rows.sort_by(|a, b| a.0.cmp(&b.0));

            let _ = writeln!(out, "# HELP {} {}", v.series, escape_help(&v.help));
            let _ = writeln!(out, "# TYPE {} gauge", v.series);
            for (category, val) in rows {
                // `category` sorts before `job`
                let _ = writeln!(
                    out,
                    "{}{{{}=\"{}\",{}}} {}",
                    v.series,
                    CATEGORY_LABEL,
                    escape_label(&category),
                    job,
                    fmt_value(val)
                );
            }
        }
    }
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        format!("{v}")
    }
}
