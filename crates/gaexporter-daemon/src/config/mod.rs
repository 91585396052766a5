//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use gaexporter_core::error::{ExporterError, Result};

pub use schema::{ExporterConfig, FetchErrorPolicy, OverlapPolicy};

/// Environment variable naming the config file.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "gaexporter.yaml";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Config path from `CONFIG_FILE`, falling back to `gaexporter.yaml`.
pub fn path_from_env() -> String {
    std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
}
