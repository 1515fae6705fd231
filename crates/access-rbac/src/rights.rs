//! # Rights
//!
//! The CRUD rights a user holds on a single model.

use serde::{Deserialize, Serialize};

use crate::modes::Mode;

/// Granted modes on one model.
///
/// All modes start denied; absence of a right is a normal `false`.
///
/// # Example
///
/// ```
/// use access_rbac::modes::Mode;
/// use access_rbac::rights::ModelRights;
///
/// let mut rights = ModelRights::new();
/// rights.set(Mode::Read, true);
/// rights.set(Mode::Write, true);
///
/// assert!(rights.has(Mode::Read));
/// assert!(!rights.has(Mode::Unlink));
/// assert_eq!(rights.to_string(), "rw--");
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ModelRights {
    /// Read permission.
    pub read: bool,
    /// Write permission.
    pub write: bool,
    /// Create permission.
    pub create: bool,
    /// Unlink permission.
    pub unlink: bool,
}

impl ModelRights {
    /// Create rights with every mode denied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create rights with every mode granted.
    pub fn full() -> Self {
        Self {
            read: true,
            write: true,
            create: true,
            unlink: true,
        }
    }

    /// Record whether a mode is granted.
    pub fn set(&mut self, mode: Mode, granted: bool) {
        *self.slot(mode) = granted;
    }

    /// Check whether a mode is granted.
    pub fn has(&self, mode: Mode) -> bool {
        match mode {
            Mode::Read => self.read,
            Mode::Write => self.write,
            Mode::Create => self.create,
            Mode::Unlink => self.unlink,
        }
    }

    /// Check if no mode is granted.
    pub fn is_empty(&self) -> bool {
        !(self.read || self.write || self.create || self.unlink)
    }

    fn slot(&mut self, mode: Mode) -> &mut bool {
        match mode {
            Mode::Read => &mut self.read,
            Mode::Write => &mut self.write,
            Mode::Create => &mut self.create,
            Mode::Unlink => &mut self.unlink,
        }
    }
}

/// Compact `rwcu` notation, `-` for a denied mode.
impl std::fmt::Display for ModelRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |granted: bool, c: char| if granted { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.read, 'r'),
            flag(self.write, 'w'),
            flag(self.create, 'c'),
            flag(self.unlink, 'u'),
        )
    }
}

impl FromIterator<Mode> for ModelRights {
    fn from_iter<T: IntoIterator<Item = Mode>>(iter: T) -> Self {
        let mut rights = ModelRights::new();
        for mode in iter {
            rights.set(mode, true);
        }
        rights
    }
}
