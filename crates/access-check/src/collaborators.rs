//! Host platform collaborators
//!
//! The wizard never decides access on its own. It asks three host services:
//! the model registry, the permission checker and the rule resolver. Hosts
//! implement these traits over their authorization engine.

use access_rbac::{Mode, ModelInfo, RuleDomain};
use serde::{Deserialize, Serialize};

use crate::context::AsUser;
use crate::error::CheckResult;

/// What a permission checker does when a mode is not granted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DenyPolicy {
    /// Fail with [`CheckError::AccessDenied`](crate::CheckError::AccessDenied).
    Raise,
    /// Return `Ok(false)`.
    #[default]
    Report,
}

/// Registry of the host's models, keyed by technical name.
pub trait ModelRegistry: Send + Sync {
    /// All registered models, ordered by name.
    fn list_all(&self) -> Vec<ModelInfo>;

    /// Look up a model by name; `None` once it has been uninstalled.
    fn resolve(&self, name: &str) -> Option<ModelInfo>;
}

/// The host's access-control list.
pub trait PermissionChecker: Send + Sync {
    /// Whether `as_user` holds `mode` on `model`.
    ///
    /// With [`DenyPolicy::Report`] a missing right is `Ok(false)`.
    fn check(
        &self,
        as_user: AsUser,
        model: &str,
        mode: Mode,
        on_deny: DenyPolicy,
    ) -> CheckResult<bool>;
}

/// The host's row-level rule engine.
pub trait RuleResolver: Send + Sync {
    /// Row filter applied to `as_user` for `mode` on `model`.
    ///
    /// An empty [`RuleDomain`] means the user is not restricted.
    fn domain_for(&self, as_user: AsUser, model: &str, mode: Mode) -> CheckResult<RuleDomain>;
}
