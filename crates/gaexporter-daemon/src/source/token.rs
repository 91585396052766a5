use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use gaexporter_core::error::{ExporterError, Result};

use crate::credentials::ServiceAccountKey;

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
// Refresh this long before the upstream expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Supplies bearer tokens for upstream requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct Cached {
    token: String,
    refresh_at: Instant,
}

/// Service-account token source: signs an RS256 assertion and exchanges it at
/// the key's `token_uri`. Tokens are cached and shared between workers.
pub struct TokenSource {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<Cached>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ExporterError::Credentials(format!("private_key is not a usable RSA key: {e}")))?;
        Ok(Self {
            key,
            signing_key,
            http,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ExporterError::Internal(format!("system clock before epoch: {e}")))?
            .as_secs();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: ANALYTICS_READONLY_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key.private_key_id.clone());

        encode(&header, &claims, &self.signing_key)
            .map_err(|e| ExporterError::Auth(format!("sign assertion failed: {e}")))
    }

    async fn exchange(&self) -> Result<Cached> {
        let assertion = self.assertion()?;
        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ExporterError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExporterError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let tr: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ExporterError::Auth(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(tr.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS));
        tracing::debug!(expires_in = lifetime.as_secs(), "access token refreshed");
        Ok(Cached {
            token: tr.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }
}

#[async_trait]
impl TokenProvider for TokenSource {
    async fn token(&self) -> Result<String> {
        let mut guard = self.cached.lock().await;
        if let Some(c) = guard.as_ref() {
            if Instant::now() < c.refresh_at {
                return Ok(c.token.clone());
            }
        }
        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *guard = Some(fresh);
        Ok(token)
    }
}
