use std::sync::Arc;

use proptest::prelude::*;
use rolegate_domain::{PermissionKey, PermissionSnapshot, Role, RoleRef};

use crate::{LoadFailure, PermissionState};

use super::{Gate, GateOutcome, GateRule};

fn key(value: &str) -> PermissionKey {
    PermissionKey::new(value).unwrap_or_else(|error| panic!("invalid test key: {error}"))
}

fn ready(role: Role, is_super_admin: bool, permissions: &[&str]) -> PermissionState {
    PermissionState::Ready(Arc::new(PermissionSnapshot::new(
        RoleRef::from(role),
        is_super_admin,
        permissions.iter().copied(),
    )))
}

#[test]
fn loading_renders_nothing() {
    let gate = Gate::new().require(key("campaign:read"));
    let decision = gate.evaluate(&PermissionState::Loading);

    assert_eq!(decision.outcome, GateOutcome::Nothing);
    assert_eq!(decision.decided_by, GateRule::Loading);
    assert_eq!(
        gate.render(&PermissionState::Loading, "content", Some("fallback")),
        None
    );
}

#[test]
fn degraded_session_renders_fallback_for_conditions() {
    let state = PermissionState::Degraded(LoadFailure::Unavailable);

    let by_permission = Gate::new().require(key("campaign:read")).evaluate(&state);
    assert_eq!(by_permission.outcome, GateOutcome::Fallback);

    let by_role = Gate::new().require_role(Role::Viewer).evaluate(&state);
    assert_eq!(by_role.outcome, GateOutcome::Fallback);
    assert_eq!(by_role.decided_by, GateRule::RequireRole);
}

#[test]
fn role_threshold_decides_content_or_fallback() {
    let state = ready(Role::AgencyAdmin, false, &[]);

    let brand_member = Gate::new().require_role(Role::BrandMember).evaluate(&state);
    assert_eq!(brand_member.outcome, GateOutcome::Content);

    let super_admin = Gate::new().require_role(Role::SuperAdmin).evaluate(&state);
    assert_eq!(super_admin.outcome, GateOutcome::Fallback);
}

#[test]
fn conditions_are_conjunctive_in_fixed_order() {
    let state = ready(Role::Creator, false, &["content:read", "content:write"]);
    let gate = Gate::new()
        .require(key("content:read"))
        .require_all([key("content:read"), key("content:write")])
        .require_any([key("campaign:write")])
        .require_role(Role::BrandAdmin);

    let decision = gate.evaluate(&state);
    assert_eq!(decision.outcome, GateOutcome::Fallback);
    assert_eq!(decision.decided_by, GateRule::RequireAny);
}

#[test]
fn satisfied_conditions_render_content() {
    let state = ready(Role::BrandAdmin, false, &["brand:write", "campaign:read"]);
    let gate = Gate::new()
        .require(key("brand:write"))
        .require_any([key("campaign:read"), key("campaign:write")])
        .require_role(Role::BrandMember);

    let decision = gate.evaluate(&state);
    assert_eq!(decision.outcome, GateOutcome::Content);
    assert_eq!(decision.decided_by, GateRule::Default);
    assert_eq!(gate.render(&state, "content", None), Some("content"));
}

#[test]
fn fallback_defaults_to_nothing() {
    let state = ready(Role::Viewer, false, &[]);
    let gate = Gate::new().require(key("campaign:write"));

    assert_eq!(gate.render(&state, "content", None), None);
    assert_eq!(
        gate.render(&state, "content", Some("upgrade")),
        Some("upgrade")
    );
}

#[test]
fn gate_without_conditions_renders_content_once_settled() {
    let gate = Gate::new();
    let decision = gate.evaluate(&ready(Role::Viewer, false, &[]));
    assert_eq!(decision.outcome, GateOutcome::Content);
}

#[test]
fn gate_request_deserializes_from_optional_fields() {
    let gate: Result<Gate, _> = serde_json::from_str(
        r#"{"require": "campaign:read", "require_role": "brand_member"}"#,
    );
    assert!(gate.is_ok_and(|gate| {
        gate.require == Some(key("campaign:read"))
            && gate.require_all.is_none()
            && gate.require_role == Some(RoleRef::from(Role::BrandMember))
    }));
}

fn any_role() -> impl Strategy<Value = Role> {
    proptest::sample::select(Role::all().to_vec())
}

fn any_key() -> impl Strategy<Value = PermissionKey> {
    "[a-z]{1,8}:[a-z]{1,8}".prop_map(|value| key(value.as_str()))
}

proptest! {
    #[test]
    fn super_admin_passes_every_gate(
        role in any_role(),
        require in proptest::option::of(any_key()),
        require_all in proptest::option::of(proptest::collection::vec(any_key(), 0..4)),
        require_any in proptest::option::of(proptest::collection::vec(any_key(), 0..4)),
        require_role in proptest::option::of("[a-z_]{1,12}"),
    ) {
        let gate = Gate {
            require,
            require_all,
            require_any,
            require_role: require_role.map(|value| RoleRef::parse(value.as_str())),
        };

        let decision = gate.evaluate(&ready(role, true, &[]));
        prop_assert_eq!(decision.outcome, GateOutcome::Content);
        prop_assert_eq!(decision.decided_by, GateRule::SuperAdmin);
    }
}
