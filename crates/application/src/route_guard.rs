//! Imperative guard for protected routes.
//!
//! The guard reads the actor record cached at sign-in rather than the live
//! [`crate::PermissionSession`]. Navigation is decided without waiting for the
//! permission authority, at the cost of acting on a record that may be stale.
//! Gates rendered on the page still evaluate the live snapshot.

use std::sync::Arc;

use rolegate_core::SessionCredential;
use rolegate_domain::{CachedActorRecord, PermissionKey, PermissionSnapshot, RoleRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{ActorRecordCache, has_permission, meets_role};

mod route_table;

pub use route_table::RouteTable;

/// Access requirements attached to a protected route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequirement {
    /// Permission the actor's role must carry.
    #[serde(default)]
    pub permission: Option<PermissionKey>,
    /// Minimum role.
    #[serde(default)]
    pub role: Option<RoleRef>,
    /// Redirect target on denial; falls back to [`GuardPaths::default_fallback`].
    #[serde(default)]
    pub fallback_path: Option<String>,
}

impl RouteRequirement {
    /// Requires only a signed-in, approved actor.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Requires a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: PermissionKey) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Requires a minimum role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<RoleRef>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Overrides the redirect target on denial.
    #[must_use]
    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }
}

/// Redirect targets used by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Sign-in entry point.
    pub sign_in: String,
    /// Holding page for accounts awaiting approval.
    pub pending_approval: String,
    /// Target for permission and role denials without a route override.
    pub default_fallback: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            sign_in: "/login".to_owned(),
            pending_approval: "/pending-approval".to_owned(),
            default_fallback: "/".to_owned(),
        }
    }
}

/// Why the guard redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No session credential.
    SignInRequired,
    /// Account not approved yet.
    PendingApproval,
    /// Role lacks the route permission.
    MissingPermission,
    /// Role ranks below the route minimum.
    InsufficientRole,
}

impl RedirectReason {
    /// Returns a stable transport value for this reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignInRequired => "sign_in_required",
            Self::PendingApproval => "pending_approval",
            Self::MissingPermission => "missing_permission",
            Self::InsufficientRole => "insufficient_role",
        }
    }
}

/// Redirect issued by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRedirect {
    /// Why navigation was refused.
    pub reason: RedirectReason,
    /// Where to send the actor.
    pub location: String,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected route.
    Allow,
    /// Send the actor elsewhere.
    Redirect(GuardRedirect),
}

impl GuardDecision {
    fn redirect(reason: RedirectReason, location: &str) -> Self {
        Self::Redirect(GuardRedirect {
            reason,
            location: location.to_owned(),
        })
    }
}

/// Pure route guard over a credential and a cached actor record.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    paths: GuardPaths,
}

impl RouteGuard {
    /// Creates a guard redirecting to the given paths.
    #[must_use]
    pub fn new(paths: GuardPaths) -> Self {
        Self { paths }
    }

    /// Decides whether the actor may enter a route with `requirement`.
    #[must_use]
    pub fn evaluate(
        &self,
        credential: Option<&SessionCredential>,
        actor: Option<&CachedActorRecord>,
        requirement: &RouteRequirement,
    ) -> GuardDecision {
        if credential.is_none() {
            return GuardDecision::redirect(RedirectReason::SignInRequired, &self.paths.sign_in);
        }

        // Fine-grained enforcement is left to gates when nothing was cached.
        let Some(actor) = actor else {
            return GuardDecision::Allow;
        };

        if !actor.is_approved() {
            return GuardDecision::redirect(
                RedirectReason::PendingApproval,
                &self.paths.pending_approval,
            );
        }

        let fallback = requirement
            .fallback_path
            .as_deref()
            .unwrap_or(self.paths.default_fallback.as_str());

        if let Some(permission) = &requirement.permission {
            let derived = PermissionSnapshot::derived_from_actor(actor);
            if !has_permission(Some(&derived), permission.as_str()) {
                return GuardDecision::redirect(RedirectReason::MissingPermission, fallback);
            }
        }

        if !meets_role(actor.role(), requirement.role.as_ref()) {
            return GuardDecision::redirect(RedirectReason::InsufficientRole, fallback);
        }

        GuardDecision::Allow
    }
}

/// Route guard bound to a route table and the actor record cache.
#[derive(Clone)]
pub struct RouteGuardService {
    guard: RouteGuard,
    routes: RouteTable,
    actor_cache: Arc<dyn ActorRecordCache>,
}

impl RouteGuardService {
    /// Creates a guard service.
    #[must_use]
    pub fn new(guard: RouteGuard, routes: RouteTable, actor_cache: Arc<dyn ActorRecordCache>) -> Self {
        Self {
            guard,
            routes,
            actor_cache,
        }
    }

    /// Checks navigation to `path`. Paths outside the route table are allowed.
    ///
    /// A cache read failure counts as "no cached record".
    pub async fn check(&self, credential: Option<&SessionCredential>, path: &str) -> GuardDecision {
        let Some(requirement) = self.routes.requirement_for(path) else {
            return GuardDecision::Allow;
        };

        let actor = match credential {
            Some(credential) => match self.actor_cache.find_actor(credential).await {
                Ok(actor) => actor,
                Err(error) => {
                    warn!(%path, error = %error, "failed to read cached actor record");
                    None
                }
            },
            None => None,
        };

        let decision = self.guard.evaluate(credential, actor.as_ref(), requirement);
        match &decision {
            GuardDecision::Allow => debug!(%path, "route guard allowed navigation"),
            GuardDecision::Redirect(redirect) => info!(
                %path,
                reason = redirect.reason.as_str(),
                location = %redirect.location,
                "route guard redirected navigation"
            ),
        }

        decision
    }
}

#[cfg(test)]
mod tests;
