//! Parametrized SQL snippets and the snippet resolver.
//!
//! Metadata owns SQL text for select expressions, the table reference, the join
//! condition and the group-by clause. That text may embed named parameters:
//!
//! - `:name` is a **bound** parameter. Parsing replaces the marker with a single
//!   `?` and resolution appends the looked-up value to the bound parameters.
//! - `:name:` is a **literal** parameter. The marker stays in the template and
//!   resolution splices the looked-up value into the text.
//!
//! Literal parameters exist for dynamic identifiers (table suffixes, column
//! names). They are not escaped. Only feed them values the application itself
//! controls; never forward untrusted request input to a literal parameter.

use std::collections::HashMap;

use crate::value::{SqlFragment, SqlValue};

/// How a snippet parameter reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Bound through a `?` placeholder.
    Bound,
    /// Spliced into the SQL text.
    Literal,
}

/// A named parameter embedded in a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetParam {
    name: String,
    kind: ParamKind,
}

impl SnippetParam {
    /// Creates a bound parameter descriptor.
    pub fn bound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Bound,
        }
    }

    /// Creates a literal parameter descriptor.
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Literal,
        }
    }

    /// The parameter name used for lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the parameter is bound or literal.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The token replaced in the template for a literal parameter.
    pub fn marker(&self) -> String {
        format!(":{}:", self.name)
    }
}

/// A SQL text template plus its embedded parameter descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlSnippet {
    sql: String,
    params: Vec<SnippetParam>,
}

impl SqlSnippet {
    /// Parses raw metadata text, extracting `:name` and `:name:` markers.
    ///
    /// A name is `[A-Za-z_][A-Za-z0-9_]*`. A colon that follows another colon
    /// (as in a `::type` cast) or has no name after it is plain text.
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut sql = String::with_capacity(text.len());
        let mut params: Vec<SnippetParam> = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let starts_marker = c == ':'
                && (i == 0 || chars[i - 1] != ':')
                && chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_');
            if !starts_marker {
                sql.push(c);
                i += 1;
                continue;
            }

            let mut end = i + 1;
            while chars
                .get(end)
                .is_some_and(|n| n.is_ascii_alphanumeric() || *n == '_')
            {
                end += 1;
            }
            let name: String = chars[i + 1..end].iter().collect();
            let closed = chars.get(end) == Some(&':') && chars.get(end + 1) != Some(&':');

            if closed {
                let param = SnippetParam::literal(name);
                sql.push_str(&param.marker());
                if !params.contains(&param) {
                    params.push(param);
                }
                i = end + 1;
            } else {
                sql.push('?');
                params.push(SnippetParam::bound(name));
                i = end;
            }
        }

        Self { sql, params }
    }

    /// The SQL template.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The embedded parameters, in encounter order.
    pub fn params(&self) -> &[SnippetParam] {
        &self.params
    }

    /// Returns true if the template is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.sql.trim().is_empty()
    }
}

/// Lookup of embedded parameter values by name.
pub trait ParamLookup {
    /// Returns the value for `name`, or `None` when the request does not supply it.
    fn param(&self, name: &str) -> Option<&SqlValue>;
}

impl ParamLookup for HashMap<String, SqlValue> {
    fn param(&self, name: &str) -> Option<&SqlValue> {
        self.get(name)
    }
}

/// Resolves a snippet against a parameter lookup.
///
/// Bound parameters are appended in encounter order, binding null when the
/// lookup has no value. Literal parameters are spliced into the text.
pub fn resolve<L: ParamLookup + ?Sized>(snippet: &SqlSnippet, lookup: &L) -> SqlFragment {
    let mut sql = snippet.sql.clone();
    let mut params = Vec::new();
    for param in &snippet.params {
        let value = lookup.param(param.name());
        match param.kind() {
            ParamKind::Bound => params.push(value.cloned().unwrap_or(SqlValue::Null)),
            ParamKind::Literal => {
                if value.is_none() {
                    tracing::debug!(param = param.name(), "literal parameter absent, splicing empty string");
                }
                sql = splice_unescaped_literal(&sql, &param.marker(), value);
            }
        }
    }
    SqlFragment::with_params(sql, params)
}

/// Replaces every occurrence of `marker` with the raw text of `value`.
///
/// This performs no quoting or escaping and is therefore open to SQL injection.
/// It is the only place in the crate where a value becomes SQL text.
fn splice_unescaped_literal(sql: &str, marker: &str, value: Option<&SqlValue>) -> String {
    let text = value.map(SqlValue::literal_text).unwrap_or_default();
    sql.replace(marker, &text)
}
