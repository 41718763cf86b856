//! # Error Types
//!
//! Errors raised while building request data. Validation failures are not
//! errors: they are diagnostics, produced by `reqcheck-schema`.

use thiserror::Error;

use crate::request::Source;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum ReqcheckError {
    /// A request verb was empty or contained whitespace.
    #[error("invalid request method: {0:?}")]
    InvalidMethod(String),

    /// A structured payload meant to populate a source was not a key/value object.
    #[error("{origin} data must be an object, got {found}")]
    NotAnObject {
        /// The source the payload was meant for.
        origin: Source,
        /// JSON type name of the value that was supplied instead.
        found: &'static str,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
