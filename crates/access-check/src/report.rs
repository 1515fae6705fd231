//! Report rows produced by an access check
//!
//! One [`RightRow`] per checked model and one [`RuleRow`] per restricted
//! (model, mode) pair. Row collections are only ever replaced as a whole.

use access_rbac::{Mode, ModelInfo, ModelRights};
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, CheckResult};

/// CRUD rights of the target user on one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RightRow {
    /// Model name.
    pub model: String,
    /// Model description.
    pub model_description: String,
    /// Granted modes.
    #[serde(flatten)]
    pub rights: ModelRights,
}

impl RightRow {
    /// Create a row for `model`.
    pub fn new(model: &ModelInfo, rights: ModelRights) -> Self {
        Self {
            model: model.name.clone(),
            model_description: model.description.clone(),
            rights,
        }
    }
}

/// A row rule restricting the target user on one model and mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleRow {
    /// Model name.
    pub model: String,
    /// Model description.
    pub model_description: String,
    /// Mode the rule applies to.
    pub mode: Mode,
    /// Rendered filter expression.
    pub rule: String,
}

impl RuleRow {
    /// Create a row for `model` and `mode`.
    pub fn new(model: &ModelInfo, mode: Mode, rule: impl Into<String>) -> Self {
        Self {
            model: model.name.clone(),
            model_description: model.description.clone(),
            mode,
            rule: rule.into(),
        }
    }
}

/// A collection of report rows owned by one wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ReportRows<T> {
    rows: Vec<T>,
}

impl<T> Default for ReportRows<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> ReportRows<T> {
    /// Drop every existing row and store `rows` instead.
    pub fn replace_all(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    /// Rows in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a ReportRows<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Rights and rules computed for one target user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckReport {
    /// One row per checked model.
    pub rights: ReportRows<RightRow>,
    /// One row per restricted model and mode.
    pub rules: ReportRows<RuleRow>,
}

impl CheckReport {
    /// Replace both collections.
    pub fn replace_all(&mut self, rights: Vec<RightRow>, rules: Vec<RuleRow>) {
        self.rights.replace_all(rights);
        self.rules.replace_all(rules);
    }

    /// Rights row of `model`, if it was checked.
    pub fn right_for(&self, model: &str) -> Option<&RightRow> {
        self.rights.iter().find(|row| row.model == model)
    }

    /// Rule rows of `model`, in mode evaluation order.
    pub fn rules_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a RuleRow> + 'a {
        self.rules.iter().filter(move |row| row.model == model)
    }

    /// Rule text applied to `model` for `mode`, if any.
    pub fn rule_for(&self, model: &str, mode: Mode) -> Option<&str> {
        self.rules
            .iter()
            .find(|row| row.model == model && row.mode == mode)
            .map(|row| row.rule.as_str())
    }

    /// Check if nothing has been computed.
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty() && self.rules.is_empty()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> CheckResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CheckError::Serialization(e.to_string()))
    }
}
