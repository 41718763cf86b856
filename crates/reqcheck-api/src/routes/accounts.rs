//! # Accounts
//!
//! A demonstration resource with two guards sharing one route:
//!
//! - `POST /v1/accounts` is guarded by a schema built with the
//!   [`SchemaNode`] builders and answers 201 with the normalized body;
//! - `GET /v1/accounts` is guarded by a schema parsed from a JSON literal
//!   and answers with the normalized query.
//!
//! Each guard names its verb explicitly, so a request is checked only by
//! the guard for its own verb.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use reqcheck_core::{FieldValue, Fields, Method, RequestData};
use reqcheck_schema::{
    Alternative, Guard, Operator, Schema, SchemaError, SchemaNode, TransformError,
};

use crate::config::ApiConfig;
use crate::extractors::Validated;
use crate::state::AppState;

/// Plans an account may be created on.
pub const PLANS: [&str; 3] = ["free", "team", "enterprise"];

/// Account routes, each verb behind its own guard.
///
/// # Errors
///
/// Returns [`SchemaError`] if the search schema literal does not parse.
pub fn router(config: &ApiConfig) -> Result<Router<AppState>, SchemaError> {
    let accounts = Router::new().route(
        "/v1/accounts",
        get(search_accounts).post(create_account),
    );
    let accounts = crate::protect(accounts, create_guard(), config);
    Ok(crate::protect(accounts, search_guard()?, config))
}

/// Guard for `POST /v1/accounts`.
pub fn create_guard() -> Guard {
    let schema = Schema::new([SchemaNode::body([
        SchemaNode::field("email"),
        SchemaNode::operator(Operator::Email, "email"),
        SchemaNode::one_of("plan", PLANS.map(Alternative::literal)),
        SchemaNode::operator(Operator::Int, "seats"),
        SchemaNode::group([SchemaNode::any_of([
            SchemaNode::field("phone"),
            SchemaNode::field("address"),
        ])]),
        SchemaNode::one_of("currency", [Alternative::transform(currency_code)]),
    ])]);
    Guard::new(schema, Some(Method::Post))
}

/// Guard for `GET /v1/accounts`.
///
/// # Errors
///
/// Returns [`SchemaError`] if the schema literal does not parse.
pub fn search_guard() -> Result<Guard, SchemaError> {
    let schema = Schema::from_value(&serde_json::json!([
        "q",
        "page",
        { "$int": "page" },
        { "$query": [{ "$or": ["owner", "plan"] }] }
    ]))?;
    Ok(Guard::new(schema, Some(Method::Get)))
}

/// Accepts three ASCII letters in any case and normalizes to upper case.
fn currency_code(
    given: &FieldValue,
    _data: &RequestData,
) -> Result<Option<FieldValue>, TransformError> {
    Ok(given
        .as_text()
        .filter(|s| s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|s| FieldValue::from(s.to_ascii_uppercase())))
}

/// GET /v1/accounts: echo the normalized search parameters.
async fn search_accounts(Validated(data): Validated) -> Json<Fields> {
    Json(data.query)
}

/// POST /v1/accounts: echo the normalized account fields.
async fn create_account(Validated(data): Validated) -> (StatusCode, Json<Fields>) {
    tracing::debug!(fields = data.body.len(), "account accepted");
    (StatusCode::CREATED, Json(data.body))
}
