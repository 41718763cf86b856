//! # reqcheck-schema: Declarative Request Schemas
//!
//! Describes which fields a request must carry, where they come from, and
//! what type they must coerce to, then checks requests against that
//! description and normalizes their data in place.
//!
//! ## Evaluation (`evaluate`)
//!
//! A schema is a tree of [`SchemaNode`]s: required field names, nested
//! groups, `$or`/`$and` combinators, `$body`/`$query` source overrides,
//! coercion operators, and enumerated or transform alternatives.
//! [`evaluate()`] walks the tree once per request and returns the ordered
//! [`Diagnostics`]. A satisfied OR group discards every diagnostic at its
//! nesting level.
//!
//! ## Operators (`operator`)
//!
//! The fixed registry of `$number`, `$int`, `$date`, `$json`, `$boolean`
//! and `$email`. Operators are pure; the evaluator writes their results back.
//!
//! ## Hosting (`guard`, `middleware`)
//!
//! - [`Guard`] resolves the active source from the request verb and turns
//!   diagnostics into a [`Verdict`].
//! - [`Middleware`] wraps a guard in the `(request, response, proceed)`
//!   callback contract for hosts without a middleware stack of their own.
//!
//! ## Crate Policy
//!
//! - Depends only on `reqcheck-core` internally.
//! - Malformed schemas are rejected at construction with [`SchemaError`];
//!   evaluation itself cannot fail.
//! - Diagnostic wording lives in [`diagnostics`] only.

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod evaluate;
pub mod guard;
pub mod middleware;
pub mod operator;
pub mod schema;

pub use context::Context;
pub use diagnostics::Diagnostics;
pub use error::{SchemaError, TransformError};
pub use evaluate::evaluate;
pub use guard::{Guard, Verdict};
pub use middleware::{GuardedRequest, Middleware, PlainRequest, Proceed};
pub use operator::{Operator, OPERATORS};
pub use schema::{Alternative, Combinator, Schema, SchemaNode, Transform};
