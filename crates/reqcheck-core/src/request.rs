//! # Request Data
//!
//! The two key/value mappings a validator reads from and writes back to,
//! plus the verb and source types that select between them.
//!
//! ## Mutation Contract
//!
//! `RequestData` is handed to the evaluator by `&mut` for the duration of
//! one evaluation. After every field visit each mapping is well-formed:
//! a key is either absent or holds a correctly typed value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReqcheckError;
use crate::value::FieldValue;

/// One source's mapping from field name to value.
pub type Fields = BTreeMap<String, FieldValue>;

/// Which request mapping a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Query-string parameters.
    Query,
    /// Request body fields.
    Body,
}

impl Source {
    /// Lowercase name used in diagnostics (`"query"` / `"body"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request verb.
///
/// Parsing is case-insensitive; unknown verbs are kept verbatim (lowercased)
/// in [`Method::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Other(String),
}

impl Method {
    /// Whether this verb conventionally carries its data in the body.
    ///
    /// Only POST and PUT do; PATCH and DELETE read from the query string.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// The source this verb's fields are read from.
    pub fn source(&self) -> Source {
        if self.carries_body() {
            Source::Body
        } else {
            Source::Query
        }
    }

    /// Lowercase verb name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for Method {
    type Err = ReqcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(ReqcheckError::InvalidMethod(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        Ok(match lower.as_str() {
            "get" => Self::Get,
            "post" => Self::Post,
            "put" => Self::Put,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "head" => Self::Head,
            "options" => Self::Options,
            _ => Self::Other(lower),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// The query-sourced and body-sourced mappings of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    /// Query-string parameters.
    #[serde(default)]
    pub query: Fields,
    /// Body fields.
    #[serde(default)]
    pub body: Fields,
}

impl RequestData {
    /// Create empty request data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create request data from already-built mappings.
    pub fn from_parts(query: Fields, body: Fields) -> Self {
        Self { query, body }
    }

    /// Borrow one source's mapping.
    pub fn fields(&self, source: Source) -> &Fields {
        match source {
            Source::Query => &self.query,
            Source::Body => &self.body,
        }
    }

    /// Mutably borrow one source's mapping.
    pub fn fields_mut(&mut self, source: Source) -> &mut Fields {
        match source {
            Source::Query => &mut self.query,
            Source::Body => &mut self.body,
        }
    }

    /// Look up a field in a source.
    pub fn get(&self, source: Source, field: &str) -> Option<&FieldValue> {
        self.fields(source).get(field)
    }

    /// Whether a field is present in a source.
    pub fn contains(&self, source: Source, field: &str) -> bool {
        self.fields(source).contains_key(field)
    }

    /// Set a field in a source, returning the previous value.
    pub fn insert(
        &mut self,
        source: Source,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields_mut(source).insert(field.into(), value.into())
    }

    /// Remove a field from a source, returning its value.
    pub fn remove(&mut self, source: Source, field: &str) -> Option<FieldValue> {
        self.fields_mut(source).remove(field)
    }

    /// Merge the members of a JSON object into a source.
    ///
    /// # Errors
    ///
    /// Returns [`ReqcheckError::NotAnObject`] if `value` is not an object.
    pub fn extend_from_json(&mut self, source: Source, value: Value) -> Result<(), ReqcheckError> {
        match value {
            Value::Object(map) => {
                let fields = self.fields_mut(source);
                for (k, v) in map {
                    fields.insert(k, FieldValue::from(v));
                }
                Ok(())
            }
            other => Err(ReqcheckError::NotAnObject {
                origin: source,
                found: json_type_name(&other),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
