use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use gaexporter_core::error::{ExporterError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// Poll interval in whole seconds.
    pub interval: u64,

    pub metrics: Vec<String>,

    /// Ordered list of `metric -> [dimension]` maps.
    #[serde(default)]
    pub dimensions: Vec<HashMap<String, Vec<String>>>,

    /// Realtime view id, passed as the `ids` query parameter (e.g. `ga:123456`).
    pub viewid: String,

    #[serde(deserialize_with = "port_from_int_or_str")]
    pub promport: u16,

    #[serde(default)]
    pub overlap: OverlapPolicy,

    #[serde(default)]
    pub on_fetch_error: FetchErrorPolicy,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// What to do when a metric's previous run is still in flight at the next tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start another run regardless.
    #[default]
    Allow,
    /// Skip the metric for this tick.
    Skip,
}

/// What to do when a worker fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    /// Log, count, and keep polling.
    #[default]
    Skip,
    /// Stop the poll loop and terminate the process.
    Exit,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 {
            return Err(ExporterError::Config("interval must be greater than 0".into()));
        }
        if self.metrics.is_empty() {
            return Err(ExporterError::Config("metrics must not be empty".into()));
        }
        if let Some(m) = self.metrics.iter().find(|m| m.trim().is_empty()) {
            return Err(ExporterError::Config(format!("metric name must not be blank: {m:?}")));
        }
        if self.viewid.trim().is_empty() {
            return Err(ExporterError::Config("viewid must not be empty".into()));
        }
        if self.promport == 0 {
            return Err(ExporterError::Config("promport must be between 1 and 65535".into()));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ExporterError::Config(format!(
                "api_base must be an http(s) url: {}",
                self.api_base
            )));
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    "https://www.googleapis.com/analytics/v3".into()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Int(u64),
    Text(String),
}

// Older config files quote the port (`promport: "9100"`).
fn port_from_int_or_str<'de, D>(d: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let n = match PortValue::deserialize(d)? {
        PortValue::Int(n) => n,
        PortValue::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("promport is not a number: {s:?}")))?,
    };
    u16::try_from(n).map_err(|_| D::Error::custom(format!("promport out of range: {n}")))
}
