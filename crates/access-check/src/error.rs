//! Error types for access checks
//!
//! This module defines the errors the access-check wizard can raise: the
//! superuser gate, request validation, configuration and failures reported
//! by the host collaborators.

use access_rbac::Mode;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;

/// Access check error types.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The invoking operator is not the superuser.
    #[error("Not allowed: please connect with admin to use this wizard")]
    NotAllowed {
        /// The operator that was refused.
        operator: Uuid,
    },

    /// The wizard has no target user.
    #[error("Missing required field: user to check")]
    MissingUser,

    /// A permission checker in raising mode denied a mode.
    #[error("Access denied: {mode} on {model}")]
    AccessDenied {
        /// Model name.
        model: String,
        /// Denied mode.
        mode: Mode,
    },

    /// A host collaborator failed.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Report serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for access check operations.
pub type CheckResult<T> = Result<T, CheckError>;

impl CheckError {
    /// Check if this error should be logged at error level.
    ///
    /// A refused operator or an incomplete form is an expected outcome.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            CheckError::Collaborator(_)
                | CheckError::Serialization(_)
                | CheckError::Config(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::NotAllowed { .. } | CheckError::AccessDenied { .. } => 403,
            CheckError::MissingUser => 400,
            CheckError::Collaborator(_)
            | CheckError::Serialization(_)
            | CheckError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckError::NotAllowed { .. } => "NOT_ALLOWED",
            CheckError::MissingUser => "MISSING_USER",
            CheckError::AccessDenied { .. } => "ACCESS_DENIED",
            CheckError::Collaborator(_) => "COLLABORATOR_ERROR",
            CheckError::Serialization(_) => "SERIALIZATION_ERROR",
            CheckError::Config(_) => "CONFIG_ERROR",
        }
    }
}
