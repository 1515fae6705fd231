//! Access check configuration.
//!
//! Identifies the superuser allowed to run the wizard and controls how much
//! of the computed report is logged. Loaded from environment variables with
//! defaults matching a stock host installation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::CheckResult;

/// Well-known id of the host's built-in administrator.
pub const SUPERUSER_ID: Uuid = Uuid::from_u128(1);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Access check configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// The only operator allowed to open and compute the wizard.
    pub superuser_id: Uuid,

    /// Log every rendered rule expression at debug level.
    ///
    /// Off by default: rule text may embed record values.
    pub log_rule_domains: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            superuser_id: SUPERUSER_ID,
            log_rule_domains: false,
        }
    }
}

impl CheckConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACCESS_CHECK_SUPERUSER_ID`: superuser UUID (default: `00000000-0000-0000-0000-000000000001`)
    /// - `ACCESS_CHECK_LOG_RULES`: log rendered rules, `true`/`false`, `1`/`0`,
    ///   `yes`/`no` or `on`/`off` in any case (default: false)
    ///
    /// # Errors
    ///
    /// [`CheckError::Config`](crate::CheckError::Config) if a variable is set
    /// to an unparseable value or the superuser id is nil.
    pub fn from_env() -> CheckResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let superuser_id = match lookup("ACCESS_CHECK_SUPERUSER_ID") {
            Some(raw) => Uuid::parse_str(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                key: "ACCESS_CHECK_SUPERUSER_ID".to_string(),
                message: e.to_string(),
            })?,
            None => default.superuser_id,
        };

        let log_rule_domains = match lookup("ACCESS_CHECK_LOG_RULES") {
            Some(raw) => parse_flag("ACCESS_CHECK_LOG_RULES", &raw)?,
            None => default.log_rule_domains,
        };

        let config = Self {
            superuser_id,
            log_rule_domains,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.superuser_id.is_nil() {
            return Err(ConfigError::InvalidValue {
                key: "superuser_id".to_string(),
                message: "must not be the nil UUID".to_string(),
            });
        }
        Ok(())
    }

    /// Check whether `operator` is the configured superuser.
    pub fn is_superuser(&self, operator: Uuid) -> bool {
        operator == self.superuser_id
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}
