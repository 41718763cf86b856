//! # Validated Request Data
//!
//! [`Validated`] carries the normalized query and body fields that the
//! [`require_fields`](crate::middleware::require_fields::require_fields)
//! middleware stored on a request that passed its schema. Handlers take it
//! as an argument instead of re-parsing the query string or body:
//!
//! ```ignore
//! async fn create(Validated(data): Validated) -> impl IntoResponse {
//!     let age = data.get(Source::Body, "age").and_then(FieldValue::as_i64);
//!     // ...
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reqcheck_core::RequestData;

use crate::error::AppError;

/// Request data after schema coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated(pub RequestData);

impl Validated {
    /// Unwrap the data.
    pub fn into_inner(self) -> RequestData {
        self.0
    }
}

/// Extracts the data the validation middleware injected into extensions.
/// A route without the middleware is a wiring mistake and yields 500.
impl<S: Send + Sync> FromRequestParts<S> for Validated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Validated>()
            .cloned()
            .ok_or_else(|| AppError::Internal("route is not guarded by require_fields".into()))
    }
}
