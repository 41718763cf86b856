//! Shared application state handed to the router.

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::ApiConfig;

/// State shared by all routes.
#[derive(Clone, Default)]
pub struct AppState {
    pub config: ApiConfig,
    /// Present when a Prometheus recorder is installed; enables `/metrics`.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with the given configuration and no metrics endpoint.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle, enabling `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
