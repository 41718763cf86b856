//! # Schema Errors
//!
//! Errors raised while building a schema, and the failure type a custom
//! transform alternative may return. Neither is a validation diagnostic:
//! schema errors stop construction, transform errors are recovered into
//! a format diagnostic by the evaluator.

use thiserror::Error;

/// A schema literal could not be turned into schema nodes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A node position held something other than a field name, group, or keyed object.
    #[error("invalid schema node at {path}: expected a field name, group, or keyed object, got {found}")]
    InvalidNode {
        /// Location of the node within the schema literal.
        path: String,
        /// JSON type name of the offending value.
        found: &'static str,
    },

    /// An operator key was given something other than field names.
    #[error("invalid operand for {operator} at {path}: expected a field name or an array of field names")]
    InvalidOperand {
        /// The operator key, e.g. `$number`.
        operator: &'static str,
        /// Location of the operand within the schema literal.
        path: String,
    },

    /// A field key was given something other than an array of alternatives.
    #[error("invalid alternatives for field '{field}' at {path}: expected an array")]
    InvalidAlternatives {
        /// The field the alternatives belong to.
        field: String,
        /// Location of the value within the schema literal.
        path: String,
    },
}

/// A transform alternative failed outright (as opposed to not matching).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transform failed: {0}")]
pub struct TransformError(pub String);

impl TransformError {
    /// Create a transform error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
