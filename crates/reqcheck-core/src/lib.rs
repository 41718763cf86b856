//! # reqcheck-core: Foundational Types for Request Validation
//!
//! This crate is the leaf of the reqcheck workspace. It defines the values a
//! validator reads and writes, and the shape of the request data it mutates.
//! Every other crate in the workspace depends on `reqcheck-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value type.** [`FieldValue`] is the only representation of a
//!    request field. Raw query strings arrive as `Text`; coercion replaces
//!    them with `Number`, `Integer`, `Boolean`, `Date`, or `Json`.
//!
//! 2. **Two explicit sources.** [`RequestData`] holds the query-sourced and
//!    body-sourced mappings side by side, always addressed through
//!    [`Source`]. There is no "current source" hidden in the data itself.
//!
//! 3. **Verbs decide sources.** [`Method::source()`] is the single place
//!    that maps a request verb to the mapping it carries data in.
//!
//! 4. **Semantic date validity.** [`temporal::parse_date`] accepts a value
//!    only if it denotes a representable instant. Nothing compares rendered
//!    text against sentinel strings.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `reqcheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod request;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::ReqcheckError;
pub use request::{Fields, Method, RequestData, Source};
pub use temporal::parse_date;
pub use value::FieldValue;
