//! # reqcheck-api: Axum Integration for Schema Guards
//!
//! Puts [`reqcheck_schema::Guard`] in front of Axum routes. Guarded routes
//! reject requests that violate their schema with a structured 422 body
//! listing each diagnostic, and hand the normalized request data to
//! handlers through the [`extractors::Validated`] extractor.
//!
//! ## API Surface
//!
//! | Path                 | Module                  | Guarded |
//! |----------------------|-------------------------|---------|
//! | `/health/liveness`   | [`routes::health`]      | no      |
//! | `/health/readiness`  | [`routes::health`]      | no      |
//! | `/metrics`           | (this module)           | no      |
//! | `/v1/accounts`       | [`routes::accounts`]    | yes     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → require_fields (one per guard) → Handler
//! ```
//!
//! ## Guarding Your Own Routes
//!
//! ```ignore
//! let router = Router::new().route("/v1/items", post(create_item));
//! let router = reqcheck_api::protect(router, Guard::new(schema, Some(Method::Post)), &config);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use reqcheck_schema::{Guard, SchemaError};

use crate::config::ApiConfig;
use crate::middleware::require_fields::{require_fields, RequireFields};
use crate::state::AppState;

/// Assemble the application router.
///
/// Health probes and `/metrics` sit outside the tracing layer; `/metrics`
/// is mounted only when the state carries a Prometheus handle.
///
/// # Errors
///
/// Returns [`SchemaError`] if a route's schema literal does not parse.
pub fn app(state: AppState) -> Result<Router, SchemaError> {
    let api = routes::accounts::router(&state.config)?.layer(middleware::tracing_layer::layer());

    let mut unguarded = Router::new()
        .route("/health/liveness", get(routes::health::liveness))
        .route("/health/readiness", get(routes::health::readiness));

    if state.metrics.is_some() {
        unguarded = unguarded.route("/metrics", get(prometheus_metrics));
    }

    Ok(Router::new()
        .merge(unguarded)
        .merge(api)
        .with_state(state))
}

/// Guard every route currently on `router` with `guard`.
///
/// Layers stack: calling `protect` again with a guard for another verb
/// adds a second check to the same routes. When both guards cover a verb,
/// the later (outer) guard runs first and the inner guard evaluates its
/// normalized data, so the handler sees every coercion. Routes added after
/// the call are not guarded.
pub fn protect<S>(router: Router<S>, guard: Guard, config: &ApiConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let layer = RequireFields::new(guard, config.body_limit);
    router.route_layer(from_fn_with_state(layer, require_fields))
}

/// GET /metrics: Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
