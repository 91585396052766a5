//! Service-account key loader.
//!
//! Expects the JSON key file downloaded from the Google Cloud console
//! ("Service account keys"). The service account's email has to be granted
//! access to the Analytics view separately.

use std::collections::HashMap;
use std::fs;

use serde_json::Value;
use gaexporter_core::error::{ExporterError, Result};

/// Environment variable naming the credentials file.
pub const CRED_FILE_ENV: &str = "CRED_FILE";

const REQUIRED: [&str; 4] = ["client_email", "private_key", "private_key_id", "token_uri"];

/// The fields needed to mint access tokens.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: String,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

pub fn load_from_file(path: &str) -> Result<ServiceAccountKey> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Credentials(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

/// Parse the key file as a flat string map; non-string values are ignored.
pub fn load_from_str(s: &str) -> Result<ServiceAccountKey> {
    let raw: HashMap<String, Value> = serde_json::from_str(s)
        .map_err(|e| ExporterError::Credentials(format!("invalid json: {e}")))?;

    let mut fields: HashMap<String, String> = raw
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect();

    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|k| fields.get(*k).map_or(true, |v| v.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(ExporterError::Credentials(format!(
            "missing fields: {}",
            missing.join(", ")
        )));
    }

    let mut take = |k: &str| fields.remove(k).unwrap_or_default();
    Ok(ServiceAccountKey {
        client_email: take("client_email"),
        private_key: take("private_key"),
        private_key_id: take("private_key_id"),
        token_uri: take("token_uri"),
    })
}

pub fn path_from_env() -> Result<String> {
    std::env::var(CRED_FILE_ENV)
        .map_err(|_| ExporterError::Credentials(format!("{CRED_FILE_ENV} is not set")))
}
