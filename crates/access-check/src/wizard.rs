//! The user access check wizard
//!
//! [`AccessChecker`] is the entry point: [`AccessChecker::default_state`] opens
//! a new [`AccessCheck`] and [`AccessChecker::compute_check`] fills its report.
//! Both refuse any operator other than the configured superuser.
//!
//! ## Computation
//!
//! ```text
//! models = request.models or registry.list_all()   (by name)
//! for model in models (skip uninstalled, skip transient):
//!     for mode in read, write, create, unlink:
//!         right[mode] = permissions.check(as_user, model, mode, Report)
//!         domain      = rules.domain_for(as_user, model, mode)
//!         if domain is not empty: emit RuleRow(render(domain) or render_lossy(domain))
//!     emit RightRow
//! report.replace_all(rights, rules)
//! ```
//!
//! A malformed rule domain never aborts the run; its row shows the lossy
//! rendering instead. Rows are only replaced once every model has been
//! evaluated, so a collaborator failure leaves the previous report intact.

use std::collections::HashSet;
use std::sync::Arc;

use access_rbac::{Mode, ModelInfo, ModelRights};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::collaborators::{DenyPolicy, ModelRegistry, PermissionChecker, RuleResolver};
use crate::config::CheckConfig;
use crate::context::{AsUser, UserRef};
use crate::error::{CheckError, CheckResult};
use crate::report::{CheckReport, RightRow, RuleRow};

/// Lifecycle of a wizard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Opened, nothing computed yet.
    #[default]
    Idle,
    /// The report holds the result of the last computation.
    Computed,
}

/// One access check request and its report.
///
/// Only [`AccessChecker::default_state`] creates one, so every wizard has
/// passed the superuser gate at least once.
#[derive(Debug, Clone, Serialize)]
pub struct AccessCheck {
    /// Wizard id
    pub id: Uuid,

    /// User whose access is checked
    pub user: Option<UserRef>,

    /// Models to check; empty means every registered model
    pub models: Vec<String>,

    report: CheckReport,
    state: CheckState,
    computed_at: Option<DateTime<Utc>>,
}

impl AccessCheck {
    fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            user: None,
            models: Vec::new(),
            report: CheckReport::default(),
            state: CheckState::Idle,
            computed_at: None,
        }
    }

    /// Set the user to check.
    pub fn with_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    /// Restrict the check to `models`.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Rows of the last computation.
    pub fn report(&self) -> &CheckReport {
        &self.report
    }

    /// Current state.
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// When the report was last computed.
    pub fn computed_at(&self) -> Option<DateTime<Utc>> {
        self.computed_at
    }

    /// Display name: the checked user's login.
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default()
    }
}

/// Runs access checks against the host's authorization services.
pub struct AccessChecker {
    config: CheckConfig,
    registry: Arc<dyn ModelRegistry>,
    permissions: Arc<dyn PermissionChecker>,
    rules: Arc<dyn RuleResolver>,
}

impl std::fmt::Debug for AccessChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessChecker")
            .field("config", &self.config)
            .finish()
    }
}

impl AccessChecker {
    /// Create a checker over the host's collaborators.
    pub fn new(
        config: CheckConfig,
        registry: Arc<dyn ModelRegistry>,
        permissions: Arc<dyn PermissionChecker>,
        rules: Arc<dyn RuleResolver>,
    ) -> Self {
        Self {
            config,
            registry,
            permissions,
            rules,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Open a new wizard.
    ///
    /// # Errors
    ///
    /// [`CheckError::NotAllowed`] unless `operator` is the superuser.
    pub fn default_state(&self, operator: Uuid) -> CheckResult<AccessCheck> {
        self.ensure_superuser(operator)?;
        Ok(AccessCheck::new())
    }

    /// Recompute the report of `check`.
    ///
    /// Previous rows are replaced as a whole. On error the report is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`CheckError::NotAllowed`] unless `operator` is the superuser
    /// - [`CheckError::MissingUser`] if no user was selected
    /// - any error returned by a collaborator
    #[instrument(skip(self, check), fields(check_id = %check.id))]
    pub fn compute_check<'a>(
        &self,
        operator: Uuid,
        check: &'a mut AccessCheck,
    ) -> CheckResult<&'a CheckReport> {
        self.ensure_superuser(operator)?;
        let user = check.user.as_ref().ok_or(CheckError::MissingUser)?;
        let as_user = user.as_user();

        let models = self.resolve_models(&check.models);
        debug!(user = %user, models = models.len(), "Checking user access");

        let mut rights = Vec::with_capacity(models.len());
        let mut rules = Vec::new();
        for model in &models {
            let (right, model_rules) = self.evaluate_model(as_user, model)?;
            rights.push(right);
            rules.extend(model_rules);
        }

        info!(
            user = %user,
            rights = rights.len(),
            rules = rules.len(),
            "Access check computed"
        );

        check.report.replace_all(rights, rules);
        check.state = CheckState::Computed;
        check.computed_at = Some(Utc::now());
        Ok(&check.report)
    }

    fn ensure_superuser(&self, operator: Uuid) -> CheckResult<()> {
        if self.config.is_superuser(operator) {
            return Ok(());
        }
        warn!(operator = %operator, "Access check refused to non-superuser");
        Err(CheckError::NotAllowed { operator })
    }

    /// Models to evaluate: requested ones in request order, or every
    /// registered model by name. Uninstalled and transient models are dropped.
    fn resolve_models(&self, requested: &[String]) -> Vec<ModelInfo> {
        let candidates = if requested.is_empty() {
            let mut all = self.registry.list_all();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            all
        } else {
            let mut seen = HashSet::new();
            requested
                .iter()
                .filter(|name| seen.insert(*name))
                .filter_map(|name| {
                    let model = self.registry.resolve(name);
                    if model.is_none() {
                        debug!(model = %name, "Skipping model missing from registry");
                    }
                    model
                })
                .collect()
        };

        candidates
            .into_iter()
            .filter(|model| {
                if model.is_transient() {
                    debug!(model = %model.name, "Skipping transient model");
                }
                !model.is_transient()
            })
            .collect()
    }

    fn evaluate_model(
        &self,
        as_user: AsUser,
        model: &ModelInfo,
    ) -> CheckResult<(RightRow, Vec<RuleRow>)> {
        let mut rights = ModelRights::new();
        let mut rules = Vec::new();

        for mode in Mode::all() {
            let granted = self
                .permissions
                .check(as_user, &model.name, mode, DenyPolicy::Report)?;
            rights.set(mode, granted);

            let domain = self.rules.domain_for(as_user, &model.name, mode)?;
            if domain.is_empty() {
                continue;
            }

            let rule = match domain.render() {
                Ok(rule) => rule,
                Err(e) => {
                    warn!(model = %model.name, mode = %mode, error = %e, "Malformed rule domain");
                    domain.render_lossy()
                }
            };
            if self.config.log_rule_domains {
                debug!(model = %model.name, mode = %mode, rule = %rule, "Rule applies");
            }
            rules.push(RuleRow::new(model, mode, rule));
        }

        debug!(model = %model.name, rights = %rights, rules = rules.len(), "Model checked");
        Ok((RightRow::new(model, rights), rules))
    }
}
