//! Realtime data source.
//!
//! The worker only sees [`DataSource`]; the production implementation is
//! [`RealtimeClient`], which talks to the Realtime Reporting API with tokens
//! from a [`TokenProvider`].

mod realtime;
mod token;

use async_trait::async_trait;
use gaexporter_core::error::Result;
use gaexporter_core::query::QueryResult;

pub use realtime::RealtimeClient;
pub use token::{TokenProvider, TokenSource, ANALYTICS_READONLY_SCOPE};

/// Anything that can answer a realtime query.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(
        &self,
        view_id: &str,
        metric: &str,
        dimensions: Option<&str>,
    ) -> Result<QueryResult>;
}
