//! # Integration Tests for reqcheck-api
//!
//! Drives the assembled router end to end: health probes, guarded account
//! creation and search, structured 422 bodies, form and JSON decoding,
//! verb-scoped guards, and body size limits.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use axum::routing::post;
use axum::{Json, Router};
use reqcheck_api::extractors::Validated;
use reqcheck_core::{Fields, Method};
use reqcheck_schema::{Guard, Schema};
use serde_json::{json, Value};
use tower::ServiceExt;

use reqcheck_api::config::ApiConfig;
use reqcheck_api::state::AppState;

/// Helper: build the test app with default configuration and no metrics.
fn test_app() -> axum::Router {
    reqcheck_api::app(AppState::default()).unwrap()
}

/// Helper: build the test app with a small body limit.
fn test_app_with_limit(body_limit: usize) -> axum::Router {
    let config = ApiConfig {
        port: 8080,
        body_limit,
    };
    reqcheck_api::app(AppState::new(config)).unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/accounts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_metrics_not_mounted_without_recorder() {
    let response = test_app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Account Creation ---------------------------------------------------------

#[tokio::test]
async fn test_create_account_returns_normalized_body() {
    let response = test_app()
        .oneshot(post_json(json!({
            "email": "ops@example.com",
            "plan": "team",
            "seats": "12",
            "phone": "+1 555 0100",
            "currency": "usd"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({
            "email": "ops@example.com",
            "plan": "team",
            "seats": 12,
            "phone": "+1 555 0100",
            "currency": "USD"
        })
    );
}

#[tokio::test]
async fn test_create_account_lists_each_violation() {
    let response = test_app()
        .oneshot(post_json(json!({
            "email": "not-an-address",
            "plan": "gold",
            "seats": 2.5,
            "address": "1 Main St",
            "currency": "dollars"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"],
        json!([
            "email must be a valid email address.",
            "plan must be one of following: free, team, enterprise.",
            "seats must be an integer.",
            "currency must be valid format."
        ])
    );
}

#[tokio::test]
async fn test_create_account_requires_phone_or_address() {
    let response = test_app()
        .oneshot(post_json(json!({
            "email": "ops@example.com",
            "plan": "free",
            "seats": 1,
            "currency": "EUR"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["details"],
        json!([
            "At least one of the following.",
            "  phone must be given as body parameter.",
            "  address must be given as body parameter."
        ])
    );
}

#[tokio::test]
async fn test_create_account_from_form_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/accounts")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "email=ops%40example.com&plan=enterprise&seats=40&address=HQ&currency=gbp",
        ))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["seats"], 40);
    assert_eq!(body["currency"], "GBP");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/accounts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let response = test_app_with_limit(64)
        .oneshot(post_json(json!({ "email": "x".repeat(256) })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
}

// -- Account Search -----------------------------------------------------------

#[tokio::test]
async fn test_search_returns_coerced_query() {
    let response = test_app()
        .oneshot(get("/v1/accounts?q=acme&page=3&owner=ops"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "q": "acme", "page": 3, "owner": "ops" })
    );
}

#[tokio::test]
async fn test_search_uses_query_wording() {
    let response = test_app().oneshot(get("/v1/accounts?page=x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["details"],
        json!([
            "q must be given as query parameter.",
            "page must be an integer.",
            "At least one of the following.",
            "  owner must be given as query parameter.",
            "  plan must be given as query parameter."
        ])
    );
}

#[tokio::test]
async fn test_search_guard_does_not_check_post() {
    // The query would fail the search schema; POST is checked only by the
    // creation guard.
    let request = Request::builder()
        .method("POST")
        .uri("/v1/accounts?page=x")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "ops@example.com",
                "plan": "free",
                "seats": 1,
                "phone": "1",
                "currency": "jpy"
            })
            .to_string(),
        ))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_unguarded_verb_is_not_allowed() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/accounts")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_search_ignores_unreadable_body() {
    // GET fields come from the query string, so the body is never decoded.
    let request = Request::builder()
        .uri("/v1/accounts?q=acme&page=1&plan=team")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Stacked Guards -----------------------------------------------------------

async fn echo_body(Validated(data): Validated) -> Json<Fields> {
    Json(data.body)
}

fn guard(schema: Value, verb: Option<Method>) -> Guard {
    Guard::new(Schema::from_value(&schema).unwrap(), verb)
}

/// Two guards covering POST on one echo route; `outer` is applied last.
fn stacked(inner: Guard, outer: Guard) -> Router {
    let config = ApiConfig::default();
    let router = Router::new().route("/echo", post(echo_body));
    let router = reqcheck_api::protect(router, inner, &config);
    reqcheck_api::protect(router, outer, &config)
}

fn post_echo(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/echo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_stacked_guards_keep_every_coercion() {
    let app = stacked(
        guard(json!(["m"]), None),
        guard(json!([{ "$int": "n" }]), Some(Method::Post)),
    );
    let response = app
        .oneshot(post_echo(json!({ "n": "7", "m": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "m": "x", "n": 7 }));
}

#[tokio::test]
async fn test_stacked_guards_apply_both_coercions() {
    let app = stacked(
        guard(json!([{ "$boolean": "b" }]), Some(Method::Post)),
        guard(json!([{ "$int": "n" }]), Some(Method::Post)),
    );
    let response = app
        .oneshot(post_echo(json!({ "n": "7", "b": "true" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "b": true, "n": 7 }));
}

#[tokio::test]
async fn test_inner_guard_sees_outer_removals() {
    // The outer guard removes the malformed field; the inner guard then
    // reports it missing rather than re-reading the original body.
    let app = stacked(
        guard(json!(["n"]), Some(Method::Post)),
        guard(json!([{ "$or": [{ "$int": "n" }, "other"] }]), Some(Method::Post)),
    );
    let response = app
        .oneshot(post_echo(json!({ "n": "x", "other": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["details"],
        json!(["n must be given as body parameter."])
    );
}
