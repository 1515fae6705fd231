//! In-memory model registry
//!
//! An explicit keyed registry populated at startup. Hosts register every
//! installed model once; lookups never reflect over live types.

use std::collections::BTreeMap;

use access_rbac::ModelInfo;

use crate::collaborators::ModelRegistry;

/// Model registry backed by a sorted map.
///
/// # Example
///
/// ```
/// use access_check::{MemoryModelRegistry, ModelRegistry};
/// use access_rbac::ModelInfo;
///
/// let registry = MemoryModelRegistry::with_models([
///     ModelInfo::new("sale.order", "Sales Order"),
///     ModelInfo::new("res.partner", "Contact"),
/// ]);
///
/// let names: Vec<String> = registry.list_all().into_iter().map(|m| m.name).collect();
/// assert_eq!(names, ["res.partner", "sale.order"]);
/// assert!(registry.resolve("stock.move").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryModelRegistry {
    models: BTreeMap<String, ModelInfo>,
}

impl MemoryModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `models`.
    pub fn with_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = ModelInfo>,
    {
        let mut registry = Self::new();
        for model in models {
            registry.register(model);
        }
        registry
    }

    /// Register a model, returning the entry it replaced.
    pub fn register(&mut self, model: ModelInfo) -> Option<ModelInfo> {
        self.models.insert(model.name.clone(), model)
    }

    /// Remove a model, as when its module is uninstalled.
    pub fn unregister(&mut self, name: &str) -> Option<ModelInfo> {
        self.models.remove(name)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRegistry for MemoryModelRegistry {
    fn list_all(&self) -> Vec<ModelInfo> {
        self.models.values().cloned().collect()
    }

    fn resolve(&self, name: &str) -> Option<ModelInfo> {
        self.models.get(name).cloned()
    }
}
