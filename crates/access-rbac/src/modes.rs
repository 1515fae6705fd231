//! # Access Modes
//!
//! The four CRUD modes a host platform grants on a model.
//! Every right and every row rule is expressed per mode.

use serde::{Deserialize, Serialize};

/// Operations a user may perform on records of a model.
///
/// - **Read**: view records
/// - **Write**: modify existing records
/// - **Create**: insert new records
/// - **Unlink**: delete records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Read/view records.
    Read,

    /// Modify existing records.
    Write,

    /// Create new records.
    Create,

    /// Delete records.
    Unlink,
}

impl Mode {
    /// Get the string representation of the mode.
    ///
    /// This is the key the host's permission checker and rule resolver expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Read => "read",
            Mode::Write => "write",
            Mode::Create => "create",
            Mode::Unlink => "unlink",
        }
    }

    /// Human-readable label, as shown in report columns.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Read => "Read",
            Mode::Write => "Write",
            Mode::Create => "Create",
            Mode::Unlink => "Unlink",
        }
    }

    /// All modes in evaluation order: read, write, create, unlink.
    ///
    /// Report rows are produced in this order for every model.
    pub const fn all() -> [Mode; 4] {
        [Mode::Read, Mode::Write, Mode::Create, Mode::Unlink]
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
