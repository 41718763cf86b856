//! # Schema Guard Middleware
//!
//! Runs a [`Guard`] in front of a route. The middleware buffers the body
//! (up to the configured limit), collects query parameters and body fields
//! into [`RequestData`], and evaluates the schema:
//!
//! - satisfied: the normalized data is stored as a [`Validated`] extension
//!   and the request is forwarded with its original body bytes;
//! - violated: the request is answered with 422 and the diagnostics, and
//!   the handler never runs.
//!
//! Requests whose verb the guard does not cover are forwarded untouched,
//! so several guards with different explicit verbs can share one route.
//! When an outer guard already stored [`Validated`] data, an inner guard
//! evaluates that data instead of re-reading the request, so coercions
//! from every guard reach the handler. The body is only decoded when the
//! resolved source is the body.
//!
//! Query values and form fields arrive as text. JSON bodies must be
//! objects; their members keep their JSON types.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axum::Form;
use http_body_util::LengthLimitError;
use reqcheck_core::{Method, RequestData, Source};
use reqcheck_schema::{Guard, Verdict};

use crate::error::AppError;
use crate::extractors::Validated;

/// State for [`require_fields`]: the guard and the body buffering limit.
#[derive(Debug, Clone)]
pub struct RequireFields {
    guard: Arc<Guard>,
    body_limit: usize,
}

impl RequireFields {
    /// Create middleware state.
    pub fn new(guard: Guard, body_limit: usize) -> Self {
        Self {
            guard: Arc::new(guard),
            body_limit,
        }
    }

    /// The guard this middleware enforces.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }
}

/// Middleware that rejects requests violating the guard's schema.
pub async fn require_fields(
    State(layer): State<RequireFields>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method: Method = request.method().as_str().parse()?;
    let Some(ctx) = layer.guard.context_for(&method) else {
        return Ok(next.run(request).await);
    };

    let (mut parts, body) = request.into_parts();

    // An outer guard already normalized this request: check its result.
    let (body, mut data) = match parts.extensions.remove::<Validated>() {
        Some(Validated(data)) => (body, data),
        None => {
            let bytes = buffer_body(body, layer.body_limit).await?;
            let mut data = RequestData::new();
            read_query(&parts.uri, &mut data)?;
            if ctx.source == Source::Body {
                read_body(&method, &parts.headers, &bytes, &mut data).await?;
            }
            (Body::from(bytes), data)
        }
    };

    let label = method.to_string();
    metrics::counter!("reqcheck_requests_checked_total", "method" => label.clone()).increment(1);

    match layer.guard.check(&method, &mut data) {
        Verdict::Proceed => {
            let mut request = Request::from_parts(parts, body);
            request.extensions_mut().insert(Validated(data));
            Ok(next.run(request).await)
        }
        Verdict::Violation(message) => {
            metrics::counter!("reqcheck_violations_total", "method" => label).increment(1);
            tracing::info!(
                method = %method,
                path = %parts.uri.path(),
                lines = message.lines().count(),
                "request rejected by schema"
            );
            Err(AppError::Validation(message))
        }
    }
}

async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if err.into_inner().downcast_ref::<LengthLimitError>().is_some() {
            AppError::PayloadTooLarge { limit }
        } else {
            AppError::BadRequest("request body could not be read".into())
        }
    })
}

fn read_query(uri: &axum::http::Uri, data: &mut RequestData) -> Result<(), AppError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|err| AppError::BadRequest(format!("malformed query string: {err}")))?;
    for (key, value) in pairs {
        data.insert(Source::Query, key, value);
    }
    Ok(())
}

async fn read_body(
    method: &Method,
    headers: &HeaderMap,
    bytes: &Bytes,
    data: &mut RequestData,
) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Ok(());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|err| AppError::BadRequest(format!("malformed JSON body: {err}")))?;
        data.extend_from_json(Source::Body, value)?;
    } else if mime == "application/x-www-form-urlencoded" {
        // Form extraction reads the query string for GET/HEAD, so the body
        // is always decoded through a POST.
        let form_request = Request::builder()
            .method(axum::http::Method::POST)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(bytes.clone()))
            .map_err(|err| AppError::Internal(format!("rebuilding form request: {err}")))?;
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(form_request, &())
            .await
            .map_err(|err| AppError::BadRequest(format!("malformed form body: {}", err.body_text())))?;
        for (key, value) in pairs {
            data.insert(Source::Body, key, value);
        }
    } else {
        tracing::trace!(method = %method, content_type, "body ignored for validation");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Uri};
    use reqcheck_core::FieldValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        h
    }

    #[test]
    fn query_pairs_are_text() {
        let mut data = RequestData::new();
        let uri: Uri = "/items?page=2&tag=a%20b".parse().unwrap();
        read_query(&uri, &mut data).unwrap();
        assert_eq!(data.get(Source::Query, "page"), Some(&FieldValue::from("2")));
        assert_eq!(data.get(Source::Query, "tag"), Some(&FieldValue::from("a b")));
    }

    #[tokio::test]
    async fn json_body_keeps_types() {
        let mut data = RequestData::new();
        let body = Bytes::from_static(br#"{"age": 30, "name": "x"}"#);
        read_body(&Method::Post, &headers("application/json; charset=utf-8"), &body, &mut data)
            .await
            .unwrap();
        assert_eq!(data.get(Source::Body, "age"), Some(&FieldValue::Integer(30)));
    }

    #[tokio::test]
    async fn json_array_body_is_rejected() {
        let mut data = RequestData::new();
        let body = Bytes::from_static(b"[1,2]");
        let err = read_body(&Method::Post, &headers("application/json"), &body, &mut data)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn form_body_is_decoded() {
        let mut data = RequestData::new();
        let body = Bytes::from_static(b"email=a%40example.com&plan=team");
        read_body(
            &Method::Post,
            &headers("application/x-www-form-urlencoded"),
            &body,
            &mut data,
        )
        .await
        .unwrap();
        assert_eq!(
            data.get(Source::Body, "email"),
            Some(&FieldValue::from("a@example.com"))
        );
        assert!(data.fields(Source::Query).is_empty());
    }

    #[tokio::test]
    async fn other_content_types_are_ignored() {
        let mut data = RequestData::new();
        let body = Bytes::from_static(b"plain text");
        read_body(&Method::Post, &headers("text/plain"), &body, &mut data)
            .await
            .unwrap();
        assert!(data.fields(Source::Body).is_empty());
    }
}
