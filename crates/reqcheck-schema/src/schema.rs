//! # Schema Nodes
//!
//! A schema is an ordered group of [`SchemaNode`]s. Nodes are decided once,
//! when the schema is built, either through the builder functions on
//! [`SchemaNode`] or by parsing a JSON literal with [`Schema::from_value`].
//! Evaluation never re-inspects keys or JSON types.
//!
//! ## Literal Grammar
//!
//! ```text
//! node  := "field"                    required field
//!        | [node, ...]                nested group (logical AND)
//!        | { key: value, ... }        one node per key, in key order
//!
//! key   := "$or" | "$and"             value: group (or a single field name)
//!        | "$body" | "$query"         value: group (or a single field name)
//!        | "$number" | "$int" | "$date" | "$json" | "$boolean" | "$email"
//!                                     value: field name or array of names
//!        | any other string           field name; value: array of literals
//! ```
//!
//! Transform alternatives cannot be written as JSON and are attached with
//! [`Alternative::transform`].

use std::fmt;
use std::sync::Arc;

use reqcheck_core::{FieldValue, RequestData, Source};
use serde_json::{Map, Value};

use crate::error::{SchemaError, TransformError};
use crate::operator::Operator;

/// Which way a combinator group joins its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `$or`: satisfied when any child is.
    Or,
    /// `$and`: satisfied when every child is, even inside an outer `$or`.
    And,
}

impl Combinator {
    /// The schema key naming this combinator.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Or => "$or",
            Self::And => "$and",
        }
    }
}

type TransformFn =
    dyn Fn(&FieldValue, &RequestData) -> Result<Option<FieldValue>, TransformError> + Send + Sync;

/// A custom alternative: inspects the raw value and the request, and returns
/// the value to store, `None` for no match, or an error.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    /// Wrap a transform function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &RequestData) -> Result<Option<FieldValue>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the transform.
    pub fn apply(
        &self,
        given: &FieldValue,
        request: &RequestData,
    ) -> Result<Option<FieldValue>, TransformError> {
        (self.0)(given, request)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// One acceptable value for a field.
#[derive(Debug, Clone)]
pub enum Alternative {
    /// Matches by equality.
    Literal(FieldValue),
    /// Matches when the transform returns a value.
    Transform(Transform),
}

impl Alternative {
    /// A literal alternative.
    pub fn literal(value: impl Into<FieldValue>) -> Self {
        Self::Literal(value.into())
    }

    /// A transform alternative.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &RequestData) -> Result<Option<FieldValue>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Self::Transform(Transform::new(f))
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Transform(_) => f.write_str("<transform>"),
        }
    }
}

/// One unit of the validation grammar.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// The field must be present in the active source.
    Field(String),
    /// Nested group, evaluated conjunctively.
    Group(Vec<SchemaNode>),
    /// `$or` / `$and` group.
    Combinator {
        kind: Combinator,
        nodes: Vec<SchemaNode>,
    },
    /// `$body` / `$query` group, evaluated against a forced source.
    Source {
        source: Source,
        nodes: Vec<SchemaNode>,
    },
    /// Coerce each named field with an operator.
    Operator {
        operator: Operator,
        fields: Vec<String>,
    },
    /// The field must equal or transform through one of the alternatives.
    Alternatives {
        field: String,
        alternatives: Vec<Alternative>,
    },
}

impl SchemaNode {
    /// Require a field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// A nested conjunctive group.
    pub fn group(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Group(nodes.into_iter().collect())
    }

    /// `$or`: satisfied when any child is.
    pub fn any_of(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Combinator {
            kind: Combinator::Or,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// `$and`: every child is required, even inside an outer `$or`.
    pub fn all_of(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Combinator {
            kind: Combinator::And,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// `$body`: evaluate children against the body.
    pub fn body(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Source {
            source: Source::Body,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// `$query`: evaluate children against the query string.
    pub fn query(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Source {
            source: Source::Query,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Coerce one field with an operator.
    pub fn operator(operator: Operator, field: impl Into<String>) -> Self {
        Self::Operator {
            operator,
            fields: vec![field.into()],
        }
    }

    /// Coerce several fields with the same operator.
    pub fn operator_each<I, S>(operator: Operator, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Operator {
            operator,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Require the field to match one of the alternatives, tried in order.
    pub fn one_of(
        field: impl Into<String>,
        alternatives: impl IntoIterator<Item = Alternative>,
    ) -> Self {
        Self::Alternatives {
            field: field.into(),
            alternatives: alternatives.into_iter().collect(),
        }
    }
}

impl From<&str> for SchemaNode {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for SchemaNode {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// A top-level schema: the root group.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
}

impl Schema {
    /// Build a schema from root nodes.
    pub fn new(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Parse a schema literal.
    ///
    /// An array is the root group; a lone string or object is a root group
    /// of one.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if any node is malformed.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_group(value, "").map(|nodes| Self { nodes })
    }

    /// The root nodes in declaration order.
    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }
}

impl From<Vec<SchemaNode>> for Schema {
    fn from(nodes: Vec<SchemaNode>) -> Self {
        Self { nodes }
    }
}

fn parse_group(value: &Value, path: &str) -> Result<Vec<SchemaNode>, SchemaError> {
    match value {
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}/{i}");
                match item {
                    Value::String(name) => nodes.push(SchemaNode::Field(name.clone())),
                    Value::Array(_) => {
                        nodes.push(SchemaNode::Group(parse_group(item, &item_path)?))
                    }
                    Value::Object(map) => nodes.extend(parse_keyed(map, &item_path)?),
                    other => {
                        return Err(SchemaError::InvalidNode {
                            path: item_path,
                            found: json_type_name(other),
                        })
                    }
                }
            }
            Ok(nodes)
        }
        Value::String(name) => Ok(vec![SchemaNode::Field(name.clone())]),
        Value::Object(map) => parse_keyed(map, path),
        other => Err(SchemaError::InvalidNode {
            path: display_path(path),
            found: json_type_name(other),
        }),
    }
}

fn parse_keyed(map: &Map<String, Value>, path: &str) -> Result<Vec<SchemaNode>, SchemaError> {
    map.iter()
        .map(|(key, value)| parse_entry(key, value, &format!("{path}/{key}")))
        .collect()
}

fn parse_entry(key: &str, value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    let node = match key {
        "$or" => SchemaNode::Combinator {
            kind: Combinator::Or,
            nodes: parse_group(value, path)?,
        },
        "$and" => SchemaNode::Combinator {
            kind: Combinator::And,
            nodes: parse_group(value, path)?,
        },
        "$body" => SchemaNode::Source {
            source: Source::Body,
            nodes: parse_group(value, path)?,
        },
        "$query" => SchemaNode::Source {
            source: Source::Query,
            nodes: parse_group(value, path)?,
        },
        _ => match Operator::from_key(key) {
            Some(operator) => SchemaNode::Operator {
                operator,
                fields: parse_operand(operator, value, path)?,
            },
            None => SchemaNode::Alternatives {
                field: key.to_string(),
                alternatives: parse_alternatives(key, value, path)?,
            },
        },
    };
    Ok(node)
}

fn parse_operand(operator: Operator, value: &Value, path: &str) -> Result<Vec<String>, SchemaError> {
    let invalid = || SchemaError::InvalidOperand {
        operator: operator.key(),
        path: path.to_string(),
    };
    match value {
        Value::String(field) => Ok(vec![field.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

fn parse_alternatives(field: &str, value: &Value, path: &str) -> Result<Vec<Alternative>, SchemaError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .cloned()
            .map(|item| Alternative::Literal(FieldValue::from(item)))
            .collect()),
        _ => Err(SchemaError::InvalidAlternatives {
            field: field.to_string(),
            path: path.to_string(),
        }),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
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
