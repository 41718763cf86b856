//! # Operator Registry
//!
//! The fixed set of coercion operators a schema may name with a `$` key.
//!
//! Every operator is a pure function from an optional field value to either
//! the coerced value or a diagnostic. The evaluator performs the write-back
//! or deletion; operators never touch request data.
//!
//! ## Fixed Points
//!
//! Each operator accepts its own output unchanged, so evaluating a schema
//! twice against the same data yields no new diagnostics and no new values.
//! An absent field fails every operator.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reqcheck_core::{parse_date, FieldValue};
use serde_json::Value;

/// Local part (dotted atoms or a quoted string), `@`, then a bracketed IPv4
/// literal or dotted labels ending in an alphabetic TLD of two or more letters.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is a valid regex")
});

/// Integral floats at or beyond this magnitude do not fit in `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A named coercion operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `$number`: numeric text to a floating-point number.
    Number,
    /// `$int`: numeric text without a fractional part to an integer.
    Int,
    /// `$date`: text or epoch milliseconds to a UTC instant.
    Date,
    /// `$json`: text to a structured value.
    Json,
    /// `$boolean`: `"true"` / `"false"` to a boolean.
    Boolean,
    /// `$email`: text matching the address pattern, unchanged.
    Email,
}

/// Every registered operator, in registry order.
pub const OPERATORS: [Operator; 6] = [
    Operator::Number,
    Operator::Int,
    Operator::Date,
    Operator::Json,
    Operator::Boolean,
    Operator::Email,
];

impl Operator {
    /// The schema key naming this operator.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Number => "$number",
            Self::Int => "$int",
            Self::Date => "$date",
            Self::Json => "$json",
            Self::Boolean => "$boolean",
            Self::Email => "$email",
        }
    }

    /// Look up an operator by its schema key.
    pub fn from_key(key: &str) -> Option<Self> {
        OPERATORS.iter().copied().find(|op| op.key() == key)
    }

    /// The requirement clause that follows the field name in a diagnostic.
    pub fn requirement(&self) -> &'static str {
        match self {
            Self::Number => "must be a number.",
            Self::Int => "must be an integer.",
            Self::Date => "must be a valid date.",
            Self::Json => "must be in JSON format.",
            Self::Boolean => "must be true or false.",
            Self::Email => "must be a valid email address.",
        }
    }

    /// Coerce a field's value.
    ///
    /// Returns the value to write back under `field`, or the diagnostic to
    /// report when `given` is absent or does not satisfy the operator.
    pub fn apply(&self, field: &str, given: Option<&FieldValue>) -> Result<FieldValue, String> {
        given
            .and_then(|value| self.coerce(value))
            .ok_or_else(|| format!("{field} {}", self.requirement()))
    }

    /// Coerce a present value, or `None` if it does not satisfy the operator.
    pub fn coerce(&self, value: &FieldValue) -> Option<FieldValue> {
        match self {
            Self::Number => coerce_number(value),
            Self::Int => coerce_int(value),
            Self::Date => parse_date(value).map(FieldValue::Date),
            Self::Json => coerce_json(value),
            Self::Boolean => coerce_boolean(value),
            Self::Email => coerce_email(value),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_number(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(FieldValue::Number(*n)),
        FieldValue::Integer(i) => Some(FieldValue::Integer(*i)),
        FieldValue::Text(s) => parse_finite(s).map(FieldValue::Number),
        _ => None,
    }
}

fn whole(n: f64) -> Option<i64> {
    if n.fract() != 0.0 || n >= I64_BOUND || n < -I64_BOUND {
        return None;
    }
    Some(n as i64)
}

fn coerce_int(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Integer(i) => Some(FieldValue::Integer(*i)),
        FieldValue::Number(n) if n.is_finite() => whole(*n).map(FieldValue::Integer),
        FieldValue::Text(s) => parse_int(s).map(FieldValue::Integer),
        _ => None,
    }
}

/// Plain integer text is read exactly; other numeric forms (`10.0`, `1e3`)
/// go through `f64` and must be whole.
fn parse_int(text: &str) -> Option<i64> {
    match text.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => parse_finite(text).and_then(whole),
    }
}

fn coerce_json(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Text(s) => serde_json::from_str::<Value>(s).ok().map(FieldValue::Json),
        FieldValue::Json(v) => Some(FieldValue::Json(v.clone())),
        FieldValue::Integer(i) => Some(FieldValue::Json(Value::from(*i))),
        FieldValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(|n| FieldValue::Json(Value::Number(n))),
        FieldValue::Boolean(b) => Some(FieldValue::Json(Value::Bool(*b))),
        FieldValue::Date(_) => None,
    }
}

fn coerce_boolean(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Boolean(b) => Some(FieldValue::Boolean(*b)),
        FieldValue::Text(s) if s == "true" => Some(FieldValue::Boolean(true)),
        FieldValue::Text(s) if s == "false" => Some(FieldValue::Boolean(false)),
        _ => None,
    }
}

fn coerce_email(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Text(s) if EMAIL_PATTERN.is_match(s) => Some(value.clone()),
        _ => None,
    }
}
