//! Evaluation context passed by value down the schema tree.

use reqcheck_core::{Method, Source};

use crate::schema::Combinator;

/// Where fields are read from, how absences are worded, and whether the
/// enclosing group is a logical OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Active source.
    pub source: Source,
    /// Word absences as `"f must be given."` instead of naming the source.
    pub default_wording: bool,
    /// The enclosing group is satisfied when any child is.
    pub logical_or: bool,
}

impl Context {
    /// A conjunctive root context.
    pub fn new(source: Source, default_wording: bool) -> Self {
        Self {
            source,
            default_wording,
            logical_or: false,
        }
    }

    /// Root context for a request verb with no explicit verb configured:
    /// POST and PUT read the body with explicit wording, everything else
    /// reads the query string with default wording.
    pub fn for_request(method: &Method) -> Self {
        Self::new(method.source(), !method.carries_body())
    }

    /// Root context for a configured verb. Always explicit wording.
    pub fn for_verb(verb: &Method) -> Self {
        Self::new(verb.source(), false)
    }

    /// Context for a plain nested group.
    pub fn conjunctive(self) -> Self {
        Self {
            logical_or: false,
            ..self
        }
    }

    /// Context for a `$or` / `$and` group.
    pub fn combined(self, kind: Combinator) -> Self {
        Self {
            logical_or: kind == Combinator::Or,
            ..self
        }
    }

    /// Context for a `$body` / `$query` group. The OR flag is inherited.
    pub fn sourced(self, source: Source) -> Self {
        Self {
            source,
            default_wording: false,
            ..self
        }
    }
}
