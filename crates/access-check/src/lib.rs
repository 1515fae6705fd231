//! # Access Check
//!
//! A superuser-only diagnostic reporting, for a chosen user and set of models,
//! which CRUD rights the user holds and which row rules restrict each mode.
//!
//! ## Overview
//!
//! The access-check crate handles:
//! - **Wizard**: `default_state` / `compute_check`, both gated on the superuser
//! - **Collaborators**: Traits for the host's model registry, permission
//!   checker and rule resolver
//! - **Registry**: An explicit keyed model registry populated at startup
//! - **Report**: Right rows and rule rows, replaced as a whole on each run
//! - **Configuration**: Superuser identity and logging switches
//!
//! The crate never decides access itself. Every answer comes from the host,
//! queried on behalf of the checked user through an explicit [`AsUser`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use access_check::{
//!     AccessChecker, AsUser, CheckConfig, CheckResult, DenyPolicy, MemoryModelRegistry,
//!     PermissionChecker, RuleResolver, UserRef, SUPERUSER_ID,
//! };
//! use access_rbac::{Mode, ModelInfo, RuleDomain};
//! use uuid::Uuid;
//!
//! struct ReadOnly;
//!
//! impl PermissionChecker for ReadOnly {
//!     fn check(&self, _: AsUser, _: &str, mode: Mode, _: DenyPolicy) -> CheckResult<bool> {
//!         Ok(mode == Mode::Read)
//!     }
//! }
//!
//! impl RuleResolver for ReadOnly {
//!     fn domain_for(&self, _: AsUser, _: &str, _: Mode) -> CheckResult<RuleDomain> {
//!         Ok(RuleDomain::new())
//!     }
//! }
//!
//! let registry = MemoryModelRegistry::with_models([ModelInfo::new("sale.order", "Sales Order")]);
//! let checker = AccessChecker::new(
//!     CheckConfig::default(),
//!     Arc::new(registry),
//!     Arc::new(ReadOnly),
//!     Arc::new(ReadOnly),
//! );
//!
//! let mut check = checker
//!     .default_state(SUPERUSER_ID)
//!     .unwrap()
//!     .with_user(UserRef::new(Uuid::now_v7(), "alice"));
//!
//! let report = checker.compute_check(SUPERUSER_ID, &mut check).unwrap();
//! assert_eq!(report.rights.len(), 1);
//! ```

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod report;
pub mod wizard;

// Re-export main types
pub use collaborators::{DenyPolicy, ModelRegistry, PermissionChecker, RuleResolver};
pub use config::{CheckConfig, ConfigError, SUPERUSER_ID};
pub use context::{AsUser, UserRef};
pub use error::{CheckError, CheckResult};
pub use registry::MemoryModelRegistry;
pub use report::{CheckReport, ReportRows, RightRow, RuleRow};
pub use wizard::{AccessCheck, AccessChecker, CheckState};
