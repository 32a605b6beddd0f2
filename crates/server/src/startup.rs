use std::{future::Future, path::Path, time::Duration};

use axum::{http::{header, HeaderValue, Method}, Router};
use configs::{AppConfig, StorageBackend};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{auth::CredentialHasher, runtime};

/// Load `config.toml` (or `CONFIG_PATH`); fall back to env vars when the file is absent.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let res = if Path::new(&path).exists() {
        AppConfig::load_and_validate()
    } else {
        warn!(%path, "config file not found, using environment variables");
        AppConfig::from_env()
    };
    res.map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// CORS for the single configured browser origin.
pub fn build_cors(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Open the configured stores and build the router over them.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    if cfg.storage.backend == StorageBackend::File {
        runtime::ensure_env(&cfg.storage.data_dir)
            .await
            .map_err(|e| StartupError::Runtime(e.to_string()))?;
    }
    let stores = runtime::open_stores(cfg).await?;
    let hasher = CredentialHasher::from_config(&cfg.auth)?;
    let state = AppState::new(stores, hasher);

    let cors = build_cors(&cfg.server.cors_origin)?;
    let timeout = Duration::from_secs(cfg.server.request_timeout_secs);
    Ok(routes::build_router(state, cors, timeout))
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Bind and serve until `shutdown` resolves; in-flight requests are allowed to finish.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        backend = ?cfg.storage.backend,
        cors_origin = %cfg.server.cors_origin,
        "server listening"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
