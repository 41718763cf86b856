//! Health probes. Never guarded.

/// GET /health/liveness: the process is up.
pub async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness: the router is assembled and serving.
pub async fn readiness() -> &'static str {
    "ready"
}
