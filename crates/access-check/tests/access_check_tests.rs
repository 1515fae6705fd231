//! Integration tests for the access check wizard.
//!
//! The host's permission checker and rule resolver are replaced by in-memory
//! fakes that record every call, so the tests can verify both the produced
//! report and the way the host was queried.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use access_check::{
    AccessChecker, AsUser, CheckConfig, CheckError, CheckResult, CheckState, DenyPolicy,
    MemoryModelRegistry, ModelRegistry, PermissionChecker, RuleResolver, UserRef, SUPERUSER_ID,
};
use access_rbac::{Mode, ModelInfo, ModelRights, ParamValue, RuleDomain};
use uuid::Uuid;

/// Access-control list keyed by (user, model).
#[derive(Default)]
struct FakeAcl {
    grants: Mutex<HashMap<(Uuid, String), ModelRights>>,
    calls: Mutex<Vec<(AsUser, String, Mode, DenyPolicy)>>,
}

impl FakeAcl {
    fn grant(&self, user: &UserRef, model: &str, modes: &[Mode]) {
        let rights: ModelRights = modes.iter().copied().collect();
        self.grants
            .lock()
            .unwrap()
            .insert((user.id, model.to_string()), rights);
    }

    fn calls(&self) -> Vec<(AsUser, String, Mode, DenyPolicy)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PermissionChecker for FakeAcl {
    fn check(
        &self,
        as_user: AsUser,
        model: &str,
        mode: Mode,
        on_deny: DenyPolicy,
    ) -> CheckResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .push((as_user, model.to_string(), mode, on_deny));

        let granted = self
            .grants
            .lock()
            .unwrap()
            .get(&(as_user.user_id(), model.to_string()))
            .map(|rights| rights.has(mode))
            .unwrap_or(false);

        if !granted && on_deny == DenyPolicy::Raise {
            return Err(CheckError::AccessDenied {
                model: model.to_string(),
                mode,
            });
        }
        Ok(granted)
    }
}

/// Row rules keyed by (user, model, mode).
#[derive(Default)]
struct FakeRules {
    domains: Mutex<HashMap<(Uuid, String, Mode), RuleDomain>>,
    calls: Mutex<Vec<(AsUser, String, Mode)>>,
}

impl FakeRules {
    fn restrict(&self, user: &UserRef, model: &str, mode: Mode, domain: RuleDomain) {
        self.domains
            .lock()
            .unwrap()
            .insert((user.id, model.to_string(), mode), domain);
    }

    fn clear(&self) {
        self.domains.lock().unwrap().clear();
    }

    fn calls(&self) -> Vec<(AsUser, String, Mode)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RuleResolver for FakeRules {
    fn domain_for(&self, as_user: AsUser, model: &str, mode: Mode) -> CheckResult<RuleDomain> {
        self.calls
            .lock()
            .unwrap()
            .push((as_user, model.to_string(), mode));

        Ok(self
            .domains
            .lock()
            .unwrap()
            .get(&(as_user.user_id(), model.to_string(), mode))
            .cloned()
            .unwrap_or_default())
    }
}

/// Test fixture wiring the fakes into a checker.
struct TestFixture {
    alice: UserRef,
    acl: Arc<FakeAcl>,
    rules: Arc<FakeRules>,
    checker: AccessChecker,
}

impl TestFixture {
    fn new(models: Vec<ModelInfo>) -> Self {
        let acl = Arc::new(FakeAcl::default());
        let rules = Arc::new(FakeRules::default());
        let checker = AccessChecker::new(
            CheckConfig::default(),
            Arc::new(MemoryModelRegistry::with_models(models)),
            acl.clone(),
            rules.clone(),
        );

        Self {
            alice: UserRef::new(Uuid::now_v7(), "alice"),
            acl,
            rules,
            checker,
        }
    }

    fn standard() -> Self {
        Self::new(vec![
            ModelInfo::new("sale.order", "Sales Order"),
            ModelInfo::new("res.partner", "Contact"),
            ModelInfo::new("account.move", "Journal Entry"),
            ModelInfo::transient("check.user.access", "User Access Check"),
        ])
    }

    fn open(&self, models: &[&str]) -> access_check::AccessCheck {
        self.checker
            .default_state(SUPERUSER_ID)
            .unwrap()
            .with_user(self.alice.clone())
            .with_models(models.iter().copied())
    }
}

fn model_names(check: &access_check::AccessCheck) -> Vec<String> {
    check
        .report()
        .rights
        .iter()
        .map(|row| row.model.clone())
        .collect()
}

#[test]
fn test_non_superuser_cannot_open_wizard() {
    let fixture = TestFixture::standard();
    let operator = Uuid::now_v7();

    let err = fixture.checker.default_state(operator).unwrap_err();
    assert!(matches!(err, CheckError::NotAllowed { operator: o } if o == operator));
}

#[test]
fn test_non_superuser_cannot_compute_and_rows_are_kept() {
    let fixture = TestFixture::standard();
    fixture.acl.grant(&fixture.alice, "sale.order", &[Mode::Read]);
    let mut check = fixture.open(&["sale.order"]);
    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();
    let before = check.report().clone();
    let computed_at = check.computed_at();
    let calls = fixture.acl.calls().len();

    let err = fixture
        .checker
        .compute_check(Uuid::now_v7(), &mut check)
        .unwrap_err();

    assert!(matches!(err, CheckError::NotAllowed { .. }));
    assert_eq!(check.report(), &before);
    assert_eq!(check.computed_at(), computed_at);
    assert_eq!(fixture.acl.calls().len(), calls);
}

#[test]
fn test_sale_order_scenario() {
    let fixture = TestFixture::standard();
    fixture
        .acl
        .grant(&fixture.alice, "sale.order", &[Mode::Read, Mode::Write]);
    fixture.rules.restrict(
        &fixture.alice,
        "sale.order",
        Mode::Read,
        RuleDomain::new().clause("state != 'cancel'"),
    );

    let mut check = fixture.open(&["sale.order"]);
    let report = fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(report.rights.len(), 1);
    let row = report.right_for("sale.order").unwrap();
    assert_eq!(row.model_description, "Sales Order");
    assert!(row.rights.read);
    assert!(row.rights.write);
    assert!(!row.rights.create);
    assert!(!row.rights.unlink);

    assert_eq!(report.rules.len(), 1);
    let rule = &report.rules.as_slice()[0];
    assert_eq!(rule.model, "sale.order");
    assert_eq!(rule.mode, Mode::Read);
    assert_eq!(rule.rule, "state != 'cancel'");
}

#[test]
fn test_empty_selection_checks_every_persistent_model_by_name() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&[]);

    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(
        model_names(&check),
        ["account.move", "res.partner", "sale.order"]
    );
    // Models without any right still get a row
    assert!(check.report().rights.iter().all(|row| row.rights.is_empty()));
    assert!(check.report().rules.is_empty());
}

#[test]
fn test_explicit_selection_keeps_request_order() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&["sale.order", "account.move"]);

    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(model_names(&check), ["sale.order", "account.move"]);
}

#[test]
fn test_duplicate_models_are_checked_once() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&["res.partner", "res.partner"]);

    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(model_names(&check), ["res.partner"]);
    assert_eq!(fixture.acl.calls().len(), 4);
}

#[test]
fn test_transient_model_is_excluded_without_error() {
    let fixture = TestFixture::standard();
    fixture.rules.restrict(
        &fixture.alice,
        "check.user.access",
        Mode::Read,
        RuleDomain::new().clause("create_uid = %s").param(2i64),
    );
    let mut check = fixture.open(&["check.user.access", "res.partner"]);

    let report = fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert!(report.right_for("check.user.access").is_none());
    assert_eq!(report.rules_for("check.user.access").count(), 0);
    assert!(fixture
        .acl
        .calls()
        .iter()
        .all(|(_, model, _, _)| model != "check.user.access"));
    assert_eq!(report.rights.len(), 1);
}

#[test]
fn test_uninstalled_model_is_skipped() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&["stock.picking", "sale.order"]);

    let report = fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(report.rights.len(), 1);
    assert!(report.right_for("stock.picking").is_none());
}

#[test]
fn test_rule_rows_only_for_restricted_modes() {
    let fixture = TestFixture::standard();
    fixture.rules.restrict(
        &fixture.alice,
        "res.partner",
        Mode::Write,
        RuleDomain::new()
            .clause("res_partner.company_id IN %s")
            .clause("res_partner.name != %s")
            .param(vec![1i64, 2])
            .param("O'Hara"),
    );
    fixture.rules.restrict(
        &fixture.alice,
        "res.partner",
        Mode::Unlink,
        RuleDomain::new().clause("res_partner.active = %s").param(false),
    );

    let mut check = fixture.open(&["res.partner"]);
    let report = fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    let modes: Vec<Mode> = report.rules_for("res.partner").map(|r| r.mode).collect();
    assert_eq!(modes, [Mode::Write, Mode::Unlink]);
    assert_eq!(
        report.rule_for("res.partner", Mode::Write),
        Some("res_partner.company_id IN (1, 2) AND res_partner.name != 'O''Hara'")
    );
    assert_eq!(
        report.rule_for("res.partner", Mode::Unlink),
        Some("res_partner.active = false")
    );
    assert_eq!(report.rule_for("res.partner", Mode::Read), None);
}

#[test]
fn test_collaborators_are_queried_as_target_user_without_raising() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&["sale.order"]);

    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    let acl_calls = fixture.acl.calls();
    let modes: Vec<Mode> = acl_calls.iter().map(|(_, _, mode, _)| *mode).collect();
    assert_eq!(modes, Mode::all());
    for (as_user, model, _, on_deny) in &acl_calls {
        assert_eq!(as_user.user_id(), fixture.alice.id);
        assert_ne!(as_user.user_id(), SUPERUSER_ID);
        assert_eq!(model, "sale.order");
        assert_eq!(*on_deny, DenyPolicy::Report);
    }

    let rule_calls = fixture.rules.calls();
    assert_eq!(rule_calls.len(), 4);
    assert!(rule_calls
        .iter()
        .all(|(as_user, _, _)| as_user.user_id() == fixture.alice.id));
}

#[test]
fn test_recompute_is_idempotent() {
    let fixture = TestFixture::standard();
    fixture.acl.grant(&fixture.alice, "account.move", &[Mode::Read]);
    fixture.rules.restrict(
        &fixture.alice,
        "account.move",
        Mode::Read,
        RuleDomain::new().clause("company_id = %s").param(1i64),
    );
    let mut check = fixture.open(&[]);

    let first = fixture
        .checker
        .compute_check(SUPERUSER_ID, &mut check)
        .unwrap()
        .clone();
    let second = fixture
        .checker
        .compute_check(SUPERUSER_ID, &mut check)
        .unwrap()
        .clone();

    assert_eq!(first, second);
    assert_eq!(second.rights.len(), 3);
    assert_eq!(second.rules.len(), 1);
}

#[test]
fn test_recompute_replaces_previous_rows() {
    let fixture = TestFixture::standard();
    fixture.rules.restrict(
        &fixture.alice,
        "sale.order",
        Mode::Read,
        RuleDomain::new().clause("user_id = %s").param(7i64),
    );
    let mut check = fixture.open(&["sale.order", "res.partner"]);
    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();
    assert_eq!(check.report().rules.len(), 1);

    fixture.rules.clear();
    check.models = vec!["res.partner".to_string()];
    let report = fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert!(report.rules.is_empty());
    assert_eq!(report.rights.len(), 1);
    assert!(report.right_for("sale.order").is_none());
}

#[test]
fn test_missing_user_is_rejected() {
    let fixture = TestFixture::standard();
    let mut check = fixture.checker.default_state(SUPERUSER_ID).unwrap();

    let err = fixture
        .checker
        .compute_check(SUPERUSER_ID, &mut check)
        .unwrap_err();

    assert!(matches!(err, CheckError::MissingUser));
    assert_eq!(check.state(), CheckState::Idle);
}

#[test]
fn test_malformed_domain_is_reported_without_aborting() {
    let fixture = TestFixture::standard();
    fixture
        .acl
        .grant(&fixture.alice, "res.partner", &[Mode::Read]);
    fixture.rules.restrict(
        &fixture.alice,
        "sale.order",
        Mode::Create,
        RuleDomain::from_parts(["a = %s AND b = %s"], [ParamValue::from(1i64)]),
    );
    let mut check = fixture.open(&["sale.order", "res.partner"]);

    let report = fixture
        .checker
        .compute_check(SUPERUSER_ID, &mut check)
        .unwrap();

    assert_eq!(
        report.rule_for("sale.order", Mode::Create),
        Some("a = 1 AND b = %s")
    );
    assert_eq!(report.rights.len(), 2);
    assert!(report.right_for("res.partner").unwrap().rights.has(Mode::Read));
    assert_eq!(check.state(), CheckState::Computed);
}

#[test]
fn test_params_only_domain_still_produces_rule_row() {
    let fixture = TestFixture::standard();
    fixture.rules.restrict(
        &fixture.alice,
        "sale.order",
        Mode::Read,
        RuleDomain::new().param(1i64),
    );
    let mut check = fixture.open(&["sale.order", "res.partner"]);

    let report = fixture
        .checker
        .compute_check(SUPERUSER_ID, &mut check)
        .unwrap();

    assert_eq!(report.rule_for("sale.order", Mode::Read), Some("(1)"));
    assert_eq!(report.rules.len(), 1);
    assert_eq!(report.rights.len(), 2);
}

#[test]
fn test_full_registry_run_is_sorted_even_if_registry_is_not() {
    /// Registry handing out models in installation order.
    struct InstallOrderRegistry(Vec<ModelInfo>);

    impl ModelRegistry for InstallOrderRegistry {
        fn list_all(&self) -> Vec<ModelInfo> {
            self.0.clone()
        }

        fn resolve(&self, name: &str) -> Option<ModelInfo> {
            self.0.iter().find(|m| m.name == name).cloned()
        }
    }

    let registry = InstallOrderRegistry(vec![
        ModelInfo::new("sale.order", "Sales Order"),
        ModelInfo::transient("check.user.access", "User Access Check"),
        ModelInfo::new("account.move", "Journal Entry"),
        ModelInfo::new("res.partner", "Contact"),
    ]);
    let checker = AccessChecker::new(
        CheckConfig::default(),
        Arc::new(registry),
        Arc::new(FakeAcl::default()),
        Arc::new(FakeRules::default()),
    );
    let mut check = checker
        .default_state(SUPERUSER_ID)
        .unwrap()
        .with_user(UserRef::new(Uuid::now_v7(), "bob"));

    checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(
        model_names(&check),
        vec!["account.move", "res.partner", "sale.order"]
    );
}

#[test]
fn test_collaborator_error_propagates() {
    struct BrokenRules;

    impl RuleResolver for BrokenRules {
        fn domain_for(&self, _: AsUser, _: &str, _: Mode) -> CheckResult<RuleDomain> {
            Err(CheckError::Collaborator("rule cache unavailable".to_string()))
        }
    }

    let checker = AccessChecker::new(
        CheckConfig::default(),
        Arc::new(MemoryModelRegistry::with_models([ModelInfo::new(
            "sale.order",
            "Sales Order",
        )])),
        Arc::new(FakeAcl::default()),
        Arc::new(BrokenRules),
    );
    let mut check = checker
        .default_state(SUPERUSER_ID)
        .unwrap()
        .with_user(UserRef::new(Uuid::now_v7(), "bob"));

    let err = checker.compute_check(SUPERUSER_ID, &mut check).unwrap_err();

    assert!(err.is_server_error());
    assert!(check.report().is_empty());
}

#[test]
fn test_state_and_display_name() {
    let fixture = TestFixture::standard();
    let mut check = fixture.open(&["res.partner"]);
    assert_eq!(check.state(), CheckState::Idle);
    assert!(check.computed_at().is_none());
    assert_eq!(check.display_name(), "alice");

    fixture.checker.compute_check(SUPERUSER_ID, &mut check).unwrap();

    assert_eq!(check.state(), CheckState::Computed);
    assert!(check.computed_at().is_some());
}

#[test]
fn test_custom_superuser() {
    let admin = Uuid::now_v7();
    let config = CheckConfig {
        superuser_id: admin,
        ..CheckConfig::default()
    };
    let checker = AccessChecker::new(
        config,
        Arc::new(MemoryModelRegistry::new()),
        Arc::new(FakeAcl::default()),
        Arc::new(FakeRules::default()),
    );

    assert!(checker.default_state(admin).is_ok());
    assert!(matches!(
        checker.default_state(SUPERUSER_ID),
        Err(CheckError::NotAllowed { .. })
    ));
}
