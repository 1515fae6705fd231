//! # Models
//!
//! Registered data-entity types of the host platform.
//! A model is identified by a stable dotted key such as `sale.order`.

use serde::{Deserialize, Serialize};

/// Storage class of a model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Records are persisted; rights and row rules apply.
    #[default]
    Persistent,
    /// Session-scoped records (wizards, reports); the host enforces no row rules.
    Transient,
}

/// A model as known to the registry.
///
/// # Example
///
/// ```
/// use access_rbac::models::{ModelInfo, ModelKind};
///
/// let model = ModelInfo::new("sale.order", "Sales Order");
/// assert!(!model.is_transient());
///
/// let wizard = ModelInfo::transient("check.user.access", "User Access Check");
/// assert_eq!(wizard.kind, ModelKind::Transient);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ModelInfo {
    /// Technical key, e.g. `sale.order`.
    pub name: String,
    /// Human-readable description, e.g. `Sales Order`.
    pub description: String,
    /// Storage class.
    #[serde(default)]
    pub kind: ModelKind,
}

impl ModelInfo {
    /// Create a persistent model.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ModelKind::Persistent,
        }
    }

    /// Create a transient model.
    pub fn transient(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::Transient,
            ..Self::new(name, description)
        }
    }

    /// Whether this model is session-scoped.
    pub fn is_transient(&self) -> bool {
        self.kind == ModelKind::Transient
    }
}
