//! # Access RBAC Vocabulary
//!
//! Shared types for reporting what a user may do on the models of a host
//! platform.
//!
//! ## Overview
//!
//! The access-rbac crate handles:
//! - **Modes**: The four CRUD operations (read, write, create, unlink)
//! - **Models**: Registered entity types and their storage class
//! - **Rights**: The modes a user holds on one model
//! - **Rule Domains**: Row filters (clauses + bound params) and their rendering
//!
//! ## Architecture
//!
//! ```text
//! Right  = Model + Mode -> bool
//! Rule   = Model + Mode -> RuleDomain { clauses, params }
//!
//! Examples:
//!   sale.order  rw--                      - may read and write, not create/unlink
//!   sale.order  read: state != 'cancel'   - only non-cancelled orders are visible
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use access_rbac::{Mode, ModelRights, RuleDomain};
//!
//! let rights: ModelRights = [Mode::Read, Mode::Write].into_iter().collect();
//! assert_eq!(rights.to_string(), "rw--");
//!
//! let domain = RuleDomain::new()
//!     .clause("sale_order.user_id = %s")
//!     .param(7i64);
//! assert_eq!(domain.render().unwrap(), "sale_order.user_id = 7");
//! ```
//!
//! ## Integration with access-check
//!
//! `access-check` queries the host's permission checker and rule resolver in
//! these terms and turns the answers into report rows.

pub mod domain;
pub mod models;
pub mod modes;
pub mod rights;

// Re-export main types for convenience
pub use domain::{ParamValue, RenderError, RuleDomain};
pub use models::{ModelInfo, ModelKind};
pub use modes::Mode;
pub use rights::ModelRights;
