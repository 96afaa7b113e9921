//! Declarative gates evaluated against the live permission state.

use rolegate_domain::{PermissionKey, RoleRef};
use serde::{Deserialize, Serialize};

use crate::{PermissionState, has_all, has_any, has_permission, is_super_admin, meets_role};

/// What a gate renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Neither content nor fallback; the snapshot is still loading.
    Nothing,
    /// The protected content.
    Content,
    /// The fallback, which itself defaults to nothing.
    Fallback,
}

/// Rule that produced a [`GateDecision`], in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRule {
    /// The session is loading.
    Loading,
    /// The actor is a super-admin.
    SuperAdmin,
    /// The single required permission.
    Require,
    /// The all-of permission list.
    RequireAll,
    /// The any-of permission list.
    RequireAny,
    /// The minimum role.
    RequireRole,
    /// No rule objected.
    Default,
}

impl GateRule {
    /// Returns a stable transport value for this rule.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::SuperAdmin => "super_admin",
            Self::Require => "require",
            Self::RequireAll => "require_all",
            Self::RequireAny => "require_any",
            Self::RequireRole => "require_role",
            Self::Default => "default",
        }
    }
}

/// Result of evaluating a [`Gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// What to render.
    pub outcome: GateOutcome,
    /// Which rule decided.
    pub decided_by: GateRule,
}

type RuleCheck = fn(&Gate, &PermissionState) -> Option<GateOutcome>;

/// Rules in precedence order. The first rule returning an outcome decides.
const RULES: &[(GateRule, RuleCheck)] = &[
    (GateRule::Loading, Gate::check_loading),
    (GateRule::SuperAdmin, Gate::check_super_admin),
    (GateRule::Require, Gate::check_require),
    (GateRule::RequireAll, Gate::check_require_all),
    (GateRule::RequireAny, Gate::check_require_any),
    (GateRule::RequireRole, Gate::check_require_role),
];

/// Conditions guarding a protected region.
///
/// All specified conditions must pass; unspecified ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Single required permission.
    #[serde(default)]
    pub require: Option<PermissionKey>,
    /// Permissions that must all be granted.
    #[serde(default)]
    pub require_all: Option<Vec<PermissionKey>>,
    /// Permissions of which at least one must be granted.
    #[serde(default)]
    pub require_any: Option<Vec<PermissionKey>>,
    /// Minimum role.
    #[serde(default)]
    pub require_role: Option<RoleRef>,
}

impl Gate {
    /// Creates a gate with no conditions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single required permission.
    #[must_use]
    pub fn require(mut self, permission: PermissionKey) -> Self {
        self.require = Some(permission);
        self
    }

    /// Adds an all-of permission list.
    #[must_use]
    pub fn require_all(mut self, permissions: impl IntoIterator<Item = PermissionKey>) -> Self {
        self.require_all = Some(permissions.into_iter().collect());
        self
    }

    /// Adds an any-of permission list.
    #[must_use]
    pub fn require_any(mut self, permissions: impl IntoIterator<Item = PermissionKey>) -> Self {
        self.require_any = Some(permissions.into_iter().collect());
        self
    }

    /// Adds a minimum role.
    #[must_use]
    pub fn require_role(mut self, role: impl Into<RoleRef>) -> Self {
        self.require_role = Some(role.into());
        self
    }

    /// Evaluates the gate against the current session state.
    #[must_use]
    pub fn evaluate(&self, state: &PermissionState) -> GateDecision {
        RULES
            .iter()
            .find_map(|(rule, check)| {
                check(self, state).map(|outcome| GateDecision {
                    outcome,
                    decided_by: *rule,
                })
            })
            .unwrap_or(GateDecision {
                outcome: GateOutcome::Content,
                decided_by: GateRule::Default,
            })
    }

    /// Picks what to render: `content` when allowed, `fallback` when denied
    /// and `None` while loading.
    pub fn render<T>(&self, state: &PermissionState, content: T, fallback: Option<T>) -> Option<T> {
        match self.evaluate(state).outcome {
            GateOutcome::Nothing => None,
            GateOutcome::Content => Some(content),
            GateOutcome::Fallback => fallback,
        }
    }

    fn check_loading(&self, state: &PermissionState) -> Option<GateOutcome> {
        state.is_loading().then_some(GateOutcome::Nothing)
    }

    fn check_super_admin(&self, state: &PermissionState) -> Option<GateOutcome> {
        is_super_admin(state.snapshot()).then_some(GateOutcome::Content)
    }

    fn check_require(&self, state: &PermissionState) -> Option<GateOutcome> {
        let permission = self.require.as_ref()?;
        deny_unless(has_permission(state.snapshot(), permission.as_str()))
    }

    fn check_require_all(&self, state: &PermissionState) -> Option<GateOutcome> {
        let permissions = self.require_all.as_ref()?;
        deny_unless(has_all(state.snapshot(), permissions))
    }

    fn check_require_any(&self, state: &PermissionState) -> Option<GateOutcome> {
        let permissions = self.require_any.as_ref()?;
        deny_unless(has_any(state.snapshot(), permissions))
    }

    fn check_require_role(&self, state: &PermissionState) -> Option<GateOutcome> {
        let required = self.require_role.as_ref()?;
        // Without a snapshot there is no actor role to compare.
        let allowed = state
            .snapshot()
            .is_some_and(|snapshot| meets_role(snapshot.role(), Some(required)));
        deny_unless(allowed)
    }
}

fn deny_unless(allowed: bool) -> Option<GateOutcome> {
    (!allowed).then_some(GateOutcome::Fallback)
}

#[cfg(test)]
mod tests;
