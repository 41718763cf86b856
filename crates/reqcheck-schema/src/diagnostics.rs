//! # Diagnostic Formatting
//!
//! [`Diagnostics`] is the ordered list of human-readable violations an
//! evaluation produces. An empty list means the request satisfied the schema.
//!
//! The message constructors in this module are the only place diagnostic
//! wording is spelled out, so every violation reads the same way regardless
//! of which node produced it.

use std::fmt;

use reqcheck_core::Source;

use crate::schema::Alternative;

/// First line of a failed OR group.
pub const OR_HEADER: &str = "At least one of the following.";

/// Prefix applied to every line nested under an [`OR_HEADER`].
pub const OR_INDENT: &str = "  ";

/// Ordered violation lines. Empty means satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    /// An empty (satisfied) list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines, including any OR headers.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append every line of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.lines.extend(other.lines);
    }

    /// The lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume into the raw lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Indent every line and prefix the OR header.
    pub fn into_or_group(self) -> Self {
        let mut lines = Vec::with_capacity(self.lines.len() + 1);
        lines.push(OR_HEADER.to_string());
        lines.extend(self.lines.into_iter().map(|l| format!("{OR_INDENT}{l}")));
        Self { lines }
    }

    /// The newline-joined message, or `None` when satisfied.
    pub fn into_message(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.lines.join("\n"))
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl From<String> for Diagnostics {
    fn from(line: String) -> Self {
        Self { lines: vec![line] }
    }
}

impl FromIterator<String> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

/// A plain field is absent from the active source.
///
/// Default wording omits the source; explicit wording names it.
pub fn missing_field(field: &str, source: Source, default_wording: bool) -> String {
    if default_wording {
        format!("{field} must be given.")
    } else {
        format!("{field} must be given as {source} parameter.")
    }
}

/// A field with alternatives is absent. Always uses the short wording.
pub fn missing_value(field: &str) -> String {
    format!("{field} must be given.")
}

/// No transform alternative accepted the value.
pub fn invalid_format(field: &str) -> String {
    format!("{field} must be valid format.")
}

/// No literal alternative equals the value.
pub fn not_one_of(field: &str, alternatives: &[Alternative]) -> String {
    let listed = alternatives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{field} must be one of following: {listed}.")
}
