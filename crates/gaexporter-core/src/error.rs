//! Shared error type across gaexporter crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and daemon.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("config: {0}")]
    Config(String),
    #[error("credentials: {0}")]
    Credentials(String),
    #[error("auth: {0}")]
    Auth(String),
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("registration: {0}")]
    Registration(String),
    #[error("bind: {0}")]
    Bind(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Stable short code, used as a metric label value.
    pub fn code(&self) -> &'static str {
        match self {
            ExporterError::Config(_) => "config",
            ExporterError::Credentials(_) => "credentials",
            ExporterError::Auth(_) => "auth",
            ExporterError::Upstream(_) => "upstream",
            ExporterError::Decode(_) => "decode",
            ExporterError::Registration(_) => "registration",
            ExporterError::Bind(_) => "bind",
            ExporterError::Internal(_) => "internal",
        }
    }
}
