// SPDX-License-Identifier: Apache-2.0

//! Parameterized statement binding.
//!
//! A [`StatementTemplate`] can only be built from a `&'static str`, so SQL
//! text is always a constant in the program and request data can only ever
//! arrive as a typed [`SqlValue`]. [`bind`] pairs the two after checking
//! that the number of placeholders matches the number of values. Quoting and
//! escaping are left entirely to the driver's native parameter binding.
//!
//! Recognized placeholders:
//!
//! - `?` anonymous positional, numbered one past the highest index so far
//! - `$N` numbered positional (`1 <= N <= 65535`)
//! - `:name` named; repeats of the same name count once, `::` casts are skipped
//!
//! Text inside `'...'` literals, `"..."` identifiers, `$$...$$` and
//! `$tag$...$tag$` bodies, `-- ...` and `/* ... */` comments is ignored.
//!
//! # Examples
//!
//! ```
//! use reqguard_core::{Params, StatementTemplate};
//!
//! const USER_BY_NAME: StatementTemplate =
//!     StatementTemplate::new("SELECT id, name FROM users WHERE name = ?");
//!
//! let stmt = USER_BY_NAME.bind(Params::positional(["alice' OR '1'='1"]))?;
//! assert_eq!(stmt.sql(), "SELECT id, name FROM users WHERE name = ?");
//! assert_eq!(stmt.bindings().len(), 1);
//! # Ok::<(), reqguard_core::GuardError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GuardError;

/// Trusted SQL text with placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementTemplate {
    sql: &'static str,
}

impl StatementTemplate {
    /// Wraps a constant SQL string.
    #[must_use]
    pub const fn new(sql: &'static str) -> Self {
        Self { sql }
    }

    /// The SQL text.
    #[must_use]
    pub fn sql(&self) -> &'static str {
        self.sql
    }

    /// Placeholders in binding order: positional indices first, then names
    /// in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<Placeholder> {
        let scan = scan(self.sql);
        (1..=scan.positional)
            .map(Placeholder::Index)
            .chain(scan.named.iter().map(|n| Placeholder::Name((*n).to_string())))
            .collect()
    }

    /// Binds values to this template. See [`bind`].
    pub fn bind(&self, params: Params) -> Result<BoundStatement, GuardError> {
        bind(self, params)
    }
}

/// A placeholder slot in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// Positional slot, 1-based.
    Index(usize),
    /// Named slot, without the leading `:`.
    Name(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Index(i) => write!(f, "?{i}"),
            Placeholder::Name(n) => write!(f, ":{n}"),
        }
    }
}

/// Typed literal passed to the driver's parameter binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// Double precision float.
    Float(f64),
    /// Text.
    Text(String),
    /// Binary blob.
    Bytes(Vec<u8>),
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Values to bind, either by position or by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Params {
    /// Values for `?` / `$N` placeholders, in order.
    Positional(Vec<SqlValue>),
    /// Values for `:name` placeholders, keyed without the leading `:`.
    Named(BTreeMap<String, SqlValue>),
}

impl Params {
    /// No values.
    #[must_use]
    pub fn none() -> Self {
        Params::Positional(Vec::new())
    }

    /// Positional values.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Named values. A leading `:` on a key is ignored.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| {
                    let key: String = k.into();
                    let key = key.strip_prefix(':').map(str::to_string).unwrap_or(key);
                    (key, v.into())
                })
                .collect(),
        )
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(v) => v.len(),
            Params::Named(m) => m.len(),
        }
    }

    /// True if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Template paired with typed values, ready for a driver.
///
/// Only [`bind`] creates values of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundStatement {
    sql: &'static str,
    bindings: Vec<(Placeholder, SqlValue)>,
}

impl BoundStatement {
    /// The unmodified template SQL.
    #[must_use]
    pub fn sql(&self) -> &'static str {
        self.sql
    }

    /// Placeholder/value pairs in binding order.
    #[must_use]
    pub fn bindings(&self) -> &[(Placeholder, SqlValue)] {
        &self.bindings
    }

    /// Values in binding order, for drivers that bind positionally.
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.bindings.iter().map(|(_, v)| v)
    }
}

/// Store-execution seam for the data-store driver.
///
/// Implementations must hand [`BoundStatement::sql`] and the values to the
/// driver's native parameter binding and never splice values into the SQL.
pub trait Executor {
    /// Rows or affected-count, as the driver reports it.
    type Output;
    /// Driver error.
    type Error;

    /// Executes a bound statement.
    fn execute(&self, statement: &BoundStatement) -> Result<Self::Output, Self::Error>;
}

/// Binds `params` to `template`.
///
/// # Errors
///
/// - [`GuardError::ArityMismatch`] when the placeholder count differs from
///   `params.len()`
/// - [`GuardError::UnboundPlaceholder`] when counts agree but a placeholder
///   has no value of its style or name
#[instrument(level = "debug", skip_all, fields(sql = template.sql))]
pub fn bind(template: &StatementTemplate, params: Params) -> Result<BoundStatement, GuardError> {
    let scan = scan(template.sql);
    let expected = scan.positional + scan.named.len();
    let actual = params.len();

    if expected != actual {
        debug!(kind = "arity_mismatch", expected, actual, "Rejected statement parameters");
        return Err(GuardError::ArityMismatch { expected, actual });
    }

    let mut bindings = Vec::with_capacity(expected);
    match params {
        Params::Positional(values) => {
            if let Some(name) = scan.named.first() {
                return Err(unbound(Placeholder::Name((*name).to_string())));
            }
            for (i, value) in values.into_iter().enumerate() {
                bindings.push((Placeholder::Index(i + 1), value));
            }
        }
        Params::Named(mut values) => {
            if scan.positional > 0 {
                return Err(unbound(Placeholder::Index(1)));
            }
            for name in scan.named {
                let value = values
                    .remove(name)
                    .ok_or_else(|| unbound(Placeholder::Name(name.to_string())))?;
                bindings.push((Placeholder::Name(name.to_string()), value));
            }
        }
    }

    Ok(BoundStatement {
        sql: template.sql,
        bindings,
    })
}

fn unbound(placeholder: Placeholder) -> GuardError {
    debug!(kind = "unbound_placeholder", %placeholder, "Rejected statement parameters");
    GuardError::UnboundPlaceholder {
        placeholder: placeholder.to_string(),
    }
}

/// Highest `$N` index recognized as a placeholder; larger numbers are text.
pub const MAX_PLACEHOLDER_INDEX: usize = 65_535;

/// Placeholders found in a template.
#[derive(Debug, Default, PartialEq, Eq)]
struct Scan<'a> {
    positional: usize,
    named: Vec<&'a str>,
}

fn scan(sql: &str) -> Scan<'_> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut out = Scan::default();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < len {
                    if bytes[i] == quote {
                        // Doubled quote is an escaped quote inside the literal.
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < len && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b'?' => {
                out.positional += 1;
                i += 1;
            }
            b'$' => {
                if let Some(body) = dollar_tag_end(bytes, i) {
                    let tag = &bytes[i..body];
                    i = bytes[body..]
                        .windows(tag.len())
                        .position(|w| w == tag)
                        .map_or(len, |at| body + at + tag.len());
                    continue;
                }
                let end = scan_while(bytes, i + 1, |b| b.is_ascii_digit());
                // `$0` and out-of-range indices are not placeholders; treat as text.
                if let Ok(n) = sql[i + 1..end].parse::<usize>()
                    && (1..=MAX_PLACEHOLDER_INDEX).contains(&n)
                {
                    out.positional = out.positional.max(n);
                }
                i = end.max(i + 1);
            }
            b':' if bytes.get(i + 1) == Some(&b':') => {
                i += 2;
            }
            b':' => {
                let start = i + 1;
                let end = if bytes
                    .get(start)
                    .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
                {
                    scan_while(bytes, start, |b| b.is_ascii_alphanumeric() || b == b'_')
                } else {
                    start
                };
                if end > start {
                    let name = &sql[start..end];
                    if !out.named.contains(&name) {
                        out.named.push(name);
                    }
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    out
}

/// End of a dollar-quote opening tag (`$$` or `$tag$`) starting at `start`.
fn dollar_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let first = *bytes.get(start + 1)?;
    if first == b'$' {
        return Some(start + 2);
    }
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let end = scan_while(bytes, start + 1, |b| b.is_ascii_alphanumeric() || b == b'_');
    (bytes.get(end) == Some(&b'$')).then_some(end + 1)
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}
