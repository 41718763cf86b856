//! # API Middleware
//!
//! - [`require_fields`]: schema guard in front of a route.
//! - [`tracing_layer`]: per-request tracing spans.

pub mod require_fields;
pub mod tracing_layer;
