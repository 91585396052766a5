//! gaexporter
//!
//! Polls the Google Analytics Realtime Reporting API and exposes the results
//! as Prometheus gauges on `/metrics`.
//! - Config: `CONFIG_FILE` (YAML), credentials: `CRED_FILE` (service-account JSON)
//! - One worker per metric per tick, fire-and-forget

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use gaexporter_core::error::{ExporterError, Result};
use gaexporter_daemon::app_state::AppState;
use gaexporter_daemon::collect::Scheduler;
use gaexporter_daemon::source::{RealtimeClient, TokenSource};
use gaexporter_daemon::{config, credentials, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "gaexporter stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_file(&config::path_from_env())?;
    let key = credentials::load_from_file(&credentials::path_from_env()?)?;

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| ExporterError::Internal(format!("http client build failed: {e}")))?;
    let tokens = Arc::new(TokenSource::new(key, http.clone())?);
    let source = Arc::new(RealtimeClient::new(http, &cfg.api_base, tokens));

    let listen = SocketAddr::from(([0, 0, 0, 0], cfg.promport));
    let state = AppState::new(cfg, source)?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ExporterError::Bind(format!("{listen}: {e}")))?;
    tracing::info!(%listen, "gaexporter starting");

    let server = axum::serve(listener, app).into_future();
    tokio::select! {
        res = server => {
            res.map_err(|e| ExporterError::Internal(format!("scrape server failed: {e}")))?;
            Err(ExporterError::Internal("scrape server exited".into()))
        }
        res = Scheduler::new(state).run() => res,
    }
}
