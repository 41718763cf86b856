//! # Schema Evaluation
//!
//! [`evaluate`] walks a group of schema nodes against request data and
//! returns every violation in declaration order. Coercions are written back
//! into the data as they succeed; fields that fail an operator or match no
//! alternative are removed. After each field visit both mappings are
//! well-formed.
//!
//! ## OR Forgiveness
//!
//! Inside a logical-OR context, any child that produces no diagnostics
//! (a present field, a satisfied nested group, a successful coercion)
//! discards every diagnostic at that level. A `$or` group that nothing
//! satisfied is reported under the OR header with its lines indented.
//! `$and` restores conjunctive evaluation inside an outer `$or`.

use reqcheck_core::{RequestData, Source};

use crate::context::Context;
use crate::diagnostics::{self, Diagnostics};
use crate::operator::Operator;
use crate::schema::{Alternative, SchemaNode};

/// Evaluate `nodes` as one group under `ctx`.
pub fn evaluate(nodes: &[SchemaNode], data: &mut RequestData, ctx: Context) -> Diagnostics {
    let mut found = Diagnostics::new();
    let mut satisfied = false;

    for node in nodes {
        let (nested, forgiving) = match node {
            SchemaNode::Field(field) => {
                let nested = if data.contains(ctx.source, field) {
                    Diagnostics::new()
                } else {
                    tracing::trace!(field = %field, source = %ctx.source, "required field missing");
                    Diagnostics::from(diagnostics::missing_field(
                        field,
                        ctx.source,
                        ctx.default_wording,
                    ))
                };
                (nested, ctx.logical_or)
            }
            SchemaNode::Group(children) => (evaluate(children, data, ctx.conjunctive()), ctx.logical_or),
            SchemaNode::Combinator { kind, nodes } => {
                let inner = ctx.combined(*kind);
                (evaluate(nodes, data, inner), ctx.logical_or || inner.logical_or)
            }
            SchemaNode::Source { source, nodes } => {
                (evaluate(nodes, data, ctx.sourced(*source)), ctx.logical_or)
            }
            SchemaNode::Operator { operator, fields } => (
                coerce_fields(*operator, fields, data, ctx.source),
                ctx.logical_or,
            ),
            SchemaNode::Alternatives {
                field,
                alternatives,
            } => (
                match_alternatives(field, alternatives, data, ctx.source),
                ctx.logical_or,
            ),
        };

        if forgiving && nested.is_empty() {
            satisfied = true;
        }
        found.extend(nested);
    }

    if satisfied {
        tracing::trace!(discarded = found.len(), "or-group satisfied");
        return Diagnostics::new();
    }
    if ctx.logical_or {
        found.into_or_group()
    } else {
        found
    }
}

fn coerce_fields(
    operator: Operator,
    fields: &[String],
    data: &mut RequestData,
    source: Source,
) -> Diagnostics {
    let mut found = Diagnostics::new();
    for field in fields {
        match operator.apply(field, data.get(source, field)) {
            Ok(coerced) => {
                data.insert(source, field.as_str(), coerced);
            }
            Err(diagnostic) => {
                tracing::trace!(field = %field, operator = %operator, "coercion failed");
                data.remove(source, field);
                found.push(diagnostic);
            }
        }
    }
    found
}

fn match_alternatives(
    field: &str,
    alternatives: &[Alternative],
    data: &mut RequestData,
    source: Source,
) -> Diagnostics {
    let Some(given) = data.get(source, field).cloned() else {
        return Diagnostics::from(diagnostics::missing_value(field));
    };

    let mut has_transform = false;
    for alternative in alternatives {
        match alternative {
            Alternative::Literal(literal) => {
                if *literal == given {
                    return Diagnostics::new();
                }
            }
            Alternative::Transform(transform) => {
                has_transform = true;
                match transform.apply(&given, data) {
                    Ok(Some(value)) => {
                        data.insert(source, field, value);
                        return Diagnostics::new();
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(field = %field, error = %err, "transform alternative failed, treating as no match");
                    }
                }
            }
        }
    }

    data.remove(source, field);
    Diagnostics::from(if has_transform {
        diagnostics::invalid_format(field)
    } else {
        diagnostics::not_one_of(field, alternatives)
    })
}
