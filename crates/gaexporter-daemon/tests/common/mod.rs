//! Shared fakes for daemon integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use gaexporter_core::error::{ExporterError, Result};
use gaexporter_core::query::QueryResult;
use gaexporter_daemon::config::{self, ExporterConfig};
use gaexporter_daemon::source::DataSource;

pub fn rows(cells: &[&[&str]]) -> QueryResult {
    QueryResult::new(
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

/// One recorded `fetch` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub view_id: String,
    pub metric: String,
    pub dimensions: Option<String>,
}

/// In-memory source: canned responses per metric, optional gate to hold
/// fetches open.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, QueryResult>>,
    failing: Mutex<Vec<String>>,
    calls: Mutex<Vec<Call>>,
    started: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for one permit on `gate`.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(self, metric: &str, result: QueryResult) -> Self {
        self.responses.lock().unwrap().insert(metric.to_string(), result);
        self
    }

    pub fn fail(self, metric: &str) -> Self {
        self.failing.lock().unwrap().push(metric.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Fetches that have started, including ones still waiting on the gate.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn fetch(
        &self,
        view_id: &str,
        metric: &str,
        dimensions: Option<&str>,
    ) -> Result<QueryResult> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call {
            view_id: view_id.to_string(),
            metric: metric.to_string(),
            dimensions: dimensions.map(str::to_string),
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.failing.lock().unwrap().iter().any(|m| m == metric) {
            return Err(ExporterError::Upstream(format!("{metric}: 503 Service Unavailable")));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(metric)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn config(yaml: &str) -> ExporterConfig {
    config::load_from_str(yaml).expect("test config must parse")
}

/// Wait until `cond` holds, yielding to spawned tasks in between.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
