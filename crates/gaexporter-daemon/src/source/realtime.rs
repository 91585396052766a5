use std::sync::Arc;

use async_trait::async_trait;

use gaexporter_core::error::{ExporterError, Result};
use gaexporter_core::query::QueryResult;

use super::{DataSource, TokenProvider};

/// Client for `GET {api_base}/data/realtime`.
pub struct RealtimeClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RealtimeClient {
    pub fn new(http: reqwest::Client, api_base: &str, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            endpoint: format!("{}/data/realtime", api_base.trim_end_matches('/')),
            tokens,
        }
    }
}

#[async_trait]
impl DataSource for RealtimeClient {
    async fn fetch(
        &self,
        view_id: &str,
        metric: &str,
        dimensions: Option<&str>,
    ) -> Result<QueryResult> {
        let token = self.tokens.token().await?;

        let mut query = vec![("ids", view_id), ("metrics", metric)];
        if let Some(d) = dimensions {
            query.push(("dimensions", d));
        }

        let resp = self
            .http
            .get(&self.endpoint)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| ExporterError::Upstream(format!("{metric}: request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExporterError::Upstream(format!("{metric}: {status}: {body}")));
        }

        resp.json::<QueryResult>()
            .await
            .map_err(|e| ExporterError::Decode(format!("{metric}: {e}")))
    }
}
