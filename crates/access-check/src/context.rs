//! Identities involved in an access check
//!
//! The operator runs the wizard; the target user is the one whose rights are
//! reported. Collaborators are always called with an explicit [`AsUser`] so
//! the answers describe the target user, never the operator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a user of the host platform.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use access_check::UserRef;
///
/// let alice = UserRef::new(Uuid::now_v7(), "alice");
/// assert_eq!(alice.to_string(), "alice");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserRef {
    /// User ID
    pub id: Uuid,

    /// Login name, used as display name
    pub login: String,
}

impl UserRef {
    /// Creates a user reference.
    pub fn new(id: Uuid, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }

    /// Impersonation context for this user.
    pub fn as_user(&self) -> AsUser {
        AsUser(self.id)
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.login)
    }
}

/// Evaluate a collaborator call as if issued by this user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AsUser(pub Uuid);

impl AsUser {
    /// The impersonated user's id.
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for AsUser {
    fn from(id: Uuid) -> Self {
        AsUser(id)
    }
}
