//! # Request Guard
//!
//! A [`Guard`] owns one schema and an optional explicit verb, and decides
//! for each request whether it may proceed.
//!
//! ## Source Resolution
//!
//! | Explicit verb | Request verb | Source | Wording |
//! |---|---|---|---|
//! | none | POST, PUT | body | explicit |
//! | none | any other | query | default |
//! | `v` | `v` | from `v` | explicit |
//! | `v` | not `v` | evaluation skipped, request proceeds | |
//!
//! The explicit verb is fixed at construction. Requests never change it.

use reqcheck_core::{Method, RequestData};

use crate::context::Context;
use crate::diagnostics::Diagnostics;
use crate::evaluate::evaluate;
use crate::schema::Schema;

/// Outcome of checking one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No violations. The request continues to the next handler.
    Proceed,
    /// The newline-joined diagnostics.
    Violation(String),
}

impl Verdict {
    /// Whether the request may proceed.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// The violation message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Proceed => None,
            Self::Violation(message) => Some(message),
        }
    }
}

/// A schema bound to an optional explicit verb.
#[derive(Debug, Clone)]
pub struct Guard {
    schema: Schema,
    verb: Option<Method>,
}

impl Guard {
    /// Create a guard. With `verb` set, requests using any other verb are
    /// not evaluated.
    pub fn new(schema: Schema, verb: Option<Method>) -> Self {
        Self { schema, verb }
    }

    /// The guarded schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The explicit verb, if configured.
    pub fn verb(&self) -> Option<&Method> {
        self.verb.as_ref()
    }

    /// Root evaluation context for a request, or `None` when the request's
    /// verb is exempt.
    pub fn context_for(&self, method: &Method) -> Option<Context> {
        match &self.verb {
            Some(verb) if verb != method => None,
            Some(verb) => Some(Context::for_verb(verb)),
            None => Some(Context::for_request(method)),
        }
    }

    /// Evaluate the schema and return the raw diagnostics.
    pub fn diagnose(&self, method: &Method, data: &mut RequestData) -> Diagnostics {
        match self.context_for(method) {
            Some(ctx) => evaluate(self.schema.nodes(), data, ctx),
            None => Diagnostics::new(),
        }
    }

    /// Evaluate the schema, normalizing `data` in place.
    pub fn check(&self, method: &Method, data: &mut RequestData) -> Verdict {
        let Some(ctx) = self.context_for(method) else {
            tracing::debug!(
                method = %method,
                verb = ?self.verb.as_ref().map(Method::as_str),
                "verb not guarded, skipping evaluation"
            );
            return Verdict::Proceed;
        };

        let diagnostics = evaluate(self.schema.nodes(), data, ctx);
        let lines = diagnostics.len();
        match diagnostics.into_message() {
            None => {
                tracing::debug!(method = %method, source = %ctx.source, "request satisfies schema");
                Verdict::Proceed
            }
            Some(message) => {
                tracing::debug!(method = %method, source = %ctx.source, lines, "request violates schema");
                Verdict::Violation(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqcheck_core::{FieldValue, Source};
    use serde_json::json;

    fn guard(schema: serde_json::Value, verb: Option<&str>) -> Guard {
        Guard::new(
            Schema::from_value(&schema).unwrap(),
            verb.map(|v| v.parse().unwrap()),
        )
    }

    #[test]
    fn explicit_verb_selects_explicit_wording() {
        let g = guard(json!(["a", "b", "c"]), Some("get"));
        let mut data = RequestData::new();
        data.insert(Source::Query, "a", "1");
        data.insert(Source::Query, "c", "3");
        assert_eq!(
            g.check(&Method::Get, &mut data),
            Verdict::Violation("b must be given as query parameter.".into())
        );
    }

    #[test]
    fn mismatched_verb_proceeds_without_evaluating() {
        let g = guard(json!([{ "$number": "n" }]), Some("post"));
        let mut data = RequestData::new();
        data.insert(Source::Query, "n", "x");
        assert!(g.check(&Method::Get, &mut data).is_proceed());
        assert_eq!(data.get(Source::Query, "n"), Some(&FieldValue::from("x")));
    }

    #[test]
    fn no_verb_reads_body_for_post() {
        let g = guard(json!(["f"]), None);
        let verdict = g.check(&Method::Post, &mut RequestData::new());
        assert_eq!(verdict.message(), Some("f must be given as body parameter."));
    }

    #[test]
    fn no_verb_reads_query_with_default_wording_otherwise() {
        let g = guard(json!(["f"]), None);
        for method in [Method::Get, Method::Patch, Method::Delete] {
            let verdict = g.check(&method, &mut RequestData::new());
            assert_eq!(verdict.message(), Some("f must be given."), "{method}");
        }
    }

    #[test]
    fn explicit_verb_is_not_latched_by_requests() {
        let g = guard(json!(["f"]), Some("put"));
        assert!(g.check(&Method::Get, &mut RequestData::new()).is_proceed());
        assert!(!g.check(&Method::Put, &mut RequestData::new()).is_proceed());
        assert!(g.check(&Method::Get, &mut RequestData::new()).is_proceed());
        assert_eq!(g.verb(), Some(&Method::Put));
    }

    #[test]
    fn diagnose_exposes_lines() {
        let g = guard(json!([{ "$or": ["a", "b"] }]), Some("get"));
        let d = g.diagnose(&Method::Get, &mut RequestData::new());
        assert_eq!(d.len(), 3);
    }
}
