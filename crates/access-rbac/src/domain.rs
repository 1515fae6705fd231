//! # Rule Domains
//!
//! A rule domain is the row filter the host's rule engine applies for a user,
//! model and mode: an ordered list of SQL condition clauses plus the values
//! bound to their `%s` placeholders.
//!
//! [`RuleDomain::render`] turns a domain into the single expression shown to
//! operators, interpolating parameters with the storage layer's literal
//! quoting so the text is exactly what the database would see.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while interpolating parameters into clauses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A `%s` placeholder has no parameter left to consume.
    #[error("Not enough parameters: placeholder #{placeholder} but only {given} given")]
    MissingParameter {
        /// 1-based index of the unmatched placeholder.
        placeholder: usize,
        /// Number of parameters supplied.
        given: usize,
    },

    /// Parameters remain after every placeholder was filled.
    #[error("Too many parameters: {used} used, {given} given")]
    UnusedParameters {
        /// Placeholders filled.
        used: usize,
        /// Number of parameters supplied.
        given: usize,
    },

    /// A `%` followed by something other than `s` or `%`.
    #[error("Unsupported format sequence '%{found}' at byte {position}")]
    UnsupportedSequence {
        /// Byte offset of the `%`.
        position: usize,
        /// Character following the `%`.
        found: char,
    },

    /// A lone `%` closes the expression.
    #[error("Incomplete format sequence at end of expression")]
    TrailingPercent,
}

/// A value bound to a rule clause placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    /// SQL `NULL`.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal (record ids, counters).
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Text(String),
    /// Tuple, rendered for `IN (...)` clauses.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Quote this value as an SQL literal.
    ///
    /// # Example
    ///
    /// ```
    /// use access_rbac::domain::ParamValue;
    ///
    /// assert_eq!(ParamValue::from("O'Brien").to_sql_literal(), "'O''Brien'");
    /// assert_eq!(ParamValue::from(vec![1i64, 2, 3]).to_sql_literal(), "(1, 2, 3)");
    /// assert_eq!(ParamValue::Null.to_sql_literal(), "NULL");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            ParamValue::Null => "NULL".to_string(),
            ParamValue::Bool(b) => b.to_string(),
            // Leading space keeps `-%s` from turning into a `--` comment
            ParamValue::Int(i) if *i < 0 => format!(" {}", i),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => {
                if f.is_nan() {
                    "'NaN'::float".to_string()
                } else if f.is_infinite() {
                    if *f > 0.0 {
                        "'Infinity'::float".to_string()
                    } else {
                        "'-Infinity'::float".to_string()
                    }
                } else if f.is_sign_negative() {
                    format!(" {:?}", f)
                } else {
                    format!("{:?}", f)
                }
            }
            ParamValue::Text(s) => quote_text(s),
            ParamValue::List(items) => {
                if items.is_empty() {
                    return "(NULL)".to_string();
                }
                let inner: Vec<String> = items.iter().map(|v| v.to_sql_literal()).collect();
                format!("({})", inner.join(", "))
            }
        }
    }
}

fn quote_text(s: &str) -> String {
    let escaped = s.replace('\'', "''");
    if s.contains('\\') {
        format!("E'{}'", escaped.replace('\\', "\\\\"))
    } else {
        format!("'{}'", escaped)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Row filter returned by the host's rule engine.
///
/// An empty domain (no clauses and no parameters) means "no restriction".
///
/// # Example
///
/// ```
/// use access_rbac::domain::RuleDomain;
///
/// let domain = RuleDomain::new()
///     .clause("sale_order.company_id IN %s")
///     .clause("sale_order.user_id = %s")
///     .param(vec![1i64, 3])
///     .param(7i64);
///
/// assert_eq!(
///     domain.render().unwrap(),
///     "sale_order.company_id IN (1, 3) AND sale_order.user_id = 7"
/// );
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleDomain {
    /// Condition clauses, combined with `AND`.
    #[serde(default)]
    pub clauses: Vec<String>,
    /// Values bound to `%s` placeholders, in order of appearance.
    #[serde(default)]
    pub params: Vec<ParamValue>,
}

impl RuleDomain {
    /// Create an unrestricted domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a domain from clauses and parameters.
    pub fn from_parts<C, P>(clauses: C, params: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator<Item = ParamValue>,
    {
        Self {
            clauses: clauses.into_iter().map(Into::into).collect(),
            params: params.into_iter().collect(),
        }
    }

    /// Append a clause.
    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    /// Append a parameter.
    pub fn param(mut self, value: impl Into<ParamValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Check if this domain restricts nothing.
    ///
    /// A domain with parameters but no clauses still counts as a restriction.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.params.is_empty()
    }

    /// Render the domain as one fully substituted expression.
    ///
    /// Clauses are joined with ` AND `; each `%s` consumes the next parameter
    /// and `%%` yields a literal `%`.
    pub fn render(&self) -> Result<String, RenderError> {
        let template = self.clauses.join(" AND ");
        interpolate(&template, &self.params)
    }

    /// Render the domain even when it is malformed.
    ///
    /// Placeholders without a parameter stay as `%s`, stray `%` sequences are
    /// kept verbatim and unused parameters are appended as a quoted tuple, so
    /// a parameter-only domain renders as `(1)`.
    pub fn render_lossy(&self) -> String {
        let template = self.clauses.join(" AND ");
        let mut out = String::with_capacity(template.len());
        let mut remaining = self.params.iter();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    match remaining.next() {
                        Some(value) => out.push_str(&value.to_sql_literal()),
                        None => out.push_str("%s"),
                    }
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            }
        }

        let leftover: Vec<String> = remaining.map(|v| v.to_sql_literal()).collect();
        if !leftover.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("({})", leftover.join(", ")));
        }
        out
    }
}

/// Substitute `params` into the `%s` placeholders of `template`.
pub fn interpolate(template: &str, params: &[ParamValue]) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut remaining = params.iter();
    let mut used = 0;
    let mut chars = template.char_indices();

    while let Some((position, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 's')) => {
                used += 1;
                let value = remaining.next().ok_or(RenderError::MissingParameter {
                    placeholder: used,
                    given: params.len(),
                })?;
                out.push_str(&value.to_sql_literal());
            }
            Some((_, '%')) => out.push('%'),
            Some((_, found)) => {
                return Err(RenderError::UnsupportedSequence { position, found });
            }
            None => return Err(RenderError::TrailingPercent),
        }
    }

    if used != params.len() {
        return Err(RenderError::UnusedParameters {
            used,
            given: params.len(),
        });
    }

    Ok(out)
}
