use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rolegate_core::{AppError, AppResult, OrganizationId, SessionCredential};
use rolegate_domain::{ActorId, CachedActorRecord, PermissionKey, Role, RoleRef};
use tokio::sync::Mutex;

use crate::ActorRecordCache;

use super::{
    GuardDecision, GuardPaths, GuardRedirect, RedirectReason, RouteGuard, RouteGuardService,
    RouteRequirement, RouteTable,
};

#[derive(Default)]
struct FakeActorRecordCache {
    records: Mutex<HashMap<SessionCredential, CachedActorRecord>>,
    fail_reads: bool,
}

#[async_trait]
impl ActorRecordCache for FakeActorRecordCache {
    async fn find_actor(
        &self,
        credential: &SessionCredential,
    ) -> AppResult<Option<CachedActorRecord>> {
        if self.fail_reads {
            return Err(AppError::Internal("cache offline".to_owned()));
        }

        Ok(self.records.lock().await.get(credential).cloned())
    }

    async fn store_actor(
        &self,
        credential: &SessionCredential,
        record: CachedActorRecord,
    ) -> AppResult<()> {
        self.records.lock().await.insert(credential.clone(), record);
        Ok(())
    }

    async fn evict_actor(&self, credential: &SessionCredential) -> AppResult<()> {
        self.records.lock().await.remove(credential);
        Ok(())
    }
}

fn credential() -> SessionCredential {
    SessionCredential::new("token-1").unwrap_or_else(|error| panic!("{error}"))
}

fn key(value: &str) -> PermissionKey {
    PermissionKey::new(value).unwrap_or_else(|error| panic!("{error}"))
}

fn actor(role: &str, is_approved: bool) -> CachedActorRecord {
    CachedActorRecord::new(
        ActorId::new(),
        "jo@example.com",
        "Jo Park",
        RoleRef::parse(role),
        Some(OrganizationId::new()),
        is_approved,
    )
}

fn redirect(reason: RedirectReason, location: &str) -> GuardDecision {
    GuardDecision::Redirect(GuardRedirect {
        reason,
        location: location.to_owned(),
    })
}

#[test]
fn missing_credential_redirects_to_sign_in() {
    let guard = RouteGuard::default();
    let record = actor("root", true);

    let decision = guard.evaluate(None, Some(&record), &RouteRequirement::authenticated());
    assert_eq!(decision, redirect(RedirectReason::SignInRequired, "/login"));
}

#[test]
fn missing_actor_record_is_allowed() {
    let guard = RouteGuard::default();
    let requirement = RouteRequirement::authenticated()
        .with_permission(key("billing:write"))
        .with_role(Role::Root);

    let decision = guard.evaluate(Some(&credential()), None, &requirement);
    assert_eq!(decision, GuardDecision::Allow);
}

#[test]
fn unapproved_actor_waits_regardless_of_requirements() {
    let guard = RouteGuard::default();
    let record = actor("creator", false);
    let requirement = RouteRequirement::authenticated()
        .with_permission(key("campaign:delete"))
        .with_fallback("/app");

    let decision = guard.evaluate(Some(&credential()), Some(&record), &requirement);
    assert_eq!(
        decision,
        redirect(RedirectReason::PendingApproval, "/pending-approval")
    );
}

#[test]
fn permission_is_checked_against_role_defaults() {
    let guard = RouteGuard::default();
    let creator = actor("creator", true);

    let allowed = RouteRequirement::authenticated().with_permission(key("content:write"));
    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&creator), &allowed),
        GuardDecision::Allow
    );

    let denied = RouteRequirement::authenticated().with_permission(key("campaign:write"));
    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&creator), &denied),
        redirect(RedirectReason::MissingPermission, "/")
    );
}

#[test]
fn super_admin_roles_pass_permission_checks() {
    let guard = RouteGuard::default();
    let admin = actor("super_admin", true);
    let requirement = RouteRequirement::authenticated().with_permission(key("billing:write"));

    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&admin), &requirement),
        GuardDecision::Allow
    );
}

#[test]
fn role_threshold_uses_route_fallback() {
    let guard = RouteGuard::new(GuardPaths {
        sign_in: "/sign-in".to_owned(),
        pending_approval: "/waiting".to_owned(),
        default_fallback: "/home".to_owned(),
    });
    let member = actor("brand_member", true);

    let with_override = RouteRequirement::authenticated()
        .with_role(Role::AgencyAdmin)
        .with_fallback("/app/brand");
    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&member), &with_override),
        redirect(RedirectReason::InsufficientRole, "/app/brand")
    );

    let without_override = RouteRequirement::authenticated().with_role(Role::AgencyAdmin);
    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&member), &without_override),
        redirect(RedirectReason::InsufficientRole, "/home")
    );
}

#[test]
fn unknown_actor_role_fails_any_role_threshold() {
    let guard = RouteGuard::default();
    let record = actor("intern", true);
    let requirement = RouteRequirement::authenticated().with_role(Role::Viewer);

    assert_eq!(
        guard.evaluate(Some(&credential()), Some(&record), &requirement),
        redirect(RedirectReason::InsufficientRole, "/")
    );
}

#[tokio::test]
async fn service_looks_up_cached_record_for_protected_routes() {
    let cache = Arc::new(FakeActorRecordCache::default());
    let routes = RouteTable::new().protect(
        "/app/crm",
        RouteRequirement::authenticated().with_permission(key("crm:read")),
    );
    let service = RouteGuardService::new(RouteGuard::default(), routes, cache.clone());

    let stored = cache.store_actor(&credential(), actor("viewer", true)).await;
    assert!(stored.is_ok());

    let decision = service.check(Some(&credential()), "/app/crm/contacts").await;
    assert_eq!(decision, redirect(RedirectReason::MissingPermission, "/"));

    let public = service.check(None, "/pricing").await;
    assert_eq!(public, GuardDecision::Allow);
}

#[tokio::test]
async fn service_treats_cache_failure_as_missing_record() {
    let cache = Arc::new(FakeActorRecordCache {
        records: Mutex::new(HashMap::new()),
        fail_reads: true,
    });
    let routes = RouteTable::new().protect(
        "/app",
        RouteRequirement::authenticated().with_role(Role::Root),
    );
    let service = RouteGuardService::new(RouteGuard::default(), routes, cache);

    let decision = service.check(Some(&credential()), "/app").await;
    assert_eq!(decision, GuardDecision::Allow);

    let anonymous = service.check(None, "/app").await;
    assert_eq!(anonymous, redirect(RedirectReason::SignInRequired, "/login"));
}
