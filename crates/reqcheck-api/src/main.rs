//! # reqcheck-api: Binary Entry Point
//!
//! Serves the demonstration routes with schema guards.
//! Binds to a configurable port (default 8080).

use metrics_exporter_prometheus::PrometheusBuilder;
use reqcheck_api::config::ApiConfig;
use reqcheck_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env().map_err(|e| {
        tracing::error!("Configuration invalid: {e}");
        e
    })?;
    let port = config.port;

    let mut state = AppState::new(config);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => tracing::warn!("Prometheus recorder not installed: {e}. /metrics is disabled."),
    }

    let app = reqcheck_api::app(state).map_err(|e| {
        tracing::error!("Route schema invalid: {e}");
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("reqcheck API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!("cannot listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
