use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Role, RoleRef};
use tokio::sync::{Mutex, oneshot};

use crate::{EffectivePermissions, PermissionAuthority};

use super::{LoadFailure, PermissionSession, PermissionState};

/// Authority whose responses are released by the test, one channel per call.
#[derive(Default)]
struct ScriptedAuthority {
    responses: Mutex<VecDeque<oneshot::Receiver<AppResult<EffectivePermissions>>>>,
    calls: AtomicUsize,
}

impl ScriptedAuthority {
    async fn enqueue(&self) -> oneshot::Sender<AppResult<EffectivePermissions>> {
        let (sender, receiver) = oneshot::channel();
        self.responses.lock().await.push_back(receiver);
        sender
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait_for_calls(&self, expected: usize) {
        while self.calls() < expected {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PermissionAuthority for ScriptedAuthority {
    async fn fetch_effective_permissions(&self) -> AppResult<EffectivePermissions> {
        let receiver = self.responses.lock().await.pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);

        match receiver {
            Some(receiver) => receiver.await.unwrap_or_else(|_| {
                Err(AppError::Unavailable("response channel dropped".to_owned()))
            }),
            None => Err(AppError::Internal("no scripted response".to_owned())),
        }
    }
}

fn permissions(role: &str, granted: &[&str]) -> EffectivePermissions {
    EffectivePermissions {
        role: role.to_owned(),
        is_super_admin: false,
        permissions: granted.iter().map(|value| (*value).to_owned()).collect(),
    }
}

fn ready_role(state: &PermissionState) -> Option<RoleRef> {
    state.snapshot().map(|snapshot| snapshot.role().clone())
}

#[tokio::test]
async fn new_session_starts_loading() {
    let session = PermissionSession::new(Arc::new(ScriptedAuthority::default()));
    assert!(session.state().is_loading());
}

#[tokio::test]
async fn successful_init_publishes_snapshot() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let _ = response.send(Ok(permissions("viewer", &["campaign:read"])));

    let session = PermissionSession::new(authority.clone());
    let state = session.init().await;

    assert_eq!(ready_role(&state), Some(RoleRef::from(Role::Viewer)));
    assert!(
        state
            .snapshot()
            .is_some_and(|snapshot| snapshot.contains("campaign:read"))
    );
    assert_eq!(authority.calls(), 1);
}

#[tokio::test]
async fn unauthenticated_load_degrades_without_snapshot() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let _ = response.send(Err(AppError::Unauthorized("no session".to_owned())));

    let session = PermissionSession::new(authority);
    let state = session.init().await;

    assert!(matches!(
        state,
        PermissionState::Degraded(LoadFailure::Unauthenticated)
    ));
    assert!(state.snapshot().is_none());
}

#[tokio::test]
async fn transient_failure_degrades_as_unavailable() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let _ = response.send(Err(AppError::Unavailable("timeout".to_owned())));

    let session = PermissionSession::new(authority);
    let state = session.init().await;

    assert!(matches!(
        state,
        PermissionState::Degraded(LoadFailure::Unavailable)
    ));
}

#[tokio::test]
async fn refresh_reenters_loading_and_replaces_snapshot() {
    let authority = Arc::new(ScriptedAuthority::default());
    let first = authority.enqueue().await;
    let _ = first.send(Ok(permissions("viewer", &[])));

    let session = Arc::new(PermissionSession::new(authority.clone()));
    session.init().await;

    let second = authority.enqueue().await;
    let handle = session.spawn_refresh();
    authority.wait_for_calls(2).await;
    assert!(session.state().is_loading());

    let _ = second.send(Ok(permissions("brand_admin", &["brand:write"])));
    let state = handle.await.unwrap_or(PermissionState::Loading);

    assert_eq!(ready_role(&state), Some(RoleRef::from(Role::BrandAdmin)));
}

#[tokio::test]
async fn later_refresh_wins_when_earlier_one_completes_last() {
    let authority = Arc::new(ScriptedAuthority::default());
    let first = authority.enqueue().await;
    let second = authority.enqueue().await;
    let session = Arc::new(PermissionSession::new(authority.clone()));

    let first_refresh = session.spawn_refresh();
    authority.wait_for_calls(1).await;
    let second_refresh = session.spawn_refresh();
    authority.wait_for_calls(2).await;

    let _ = second.send(Ok(permissions("agency_admin", &[])));
    let _ = second_refresh.await;
    assert_eq!(
        ready_role(&session.state()),
        Some(RoleRef::from(Role::AgencyAdmin))
    );

    let _ = first.send(Ok(permissions("viewer", &[])));
    let _ = first_refresh.await;
    assert_eq!(
        ready_role(&session.state()),
        Some(RoleRef::from(Role::AgencyAdmin))
    );
}

#[tokio::test]
async fn superseded_completion_does_not_end_loading() {
    let authority = Arc::new(ScriptedAuthority::default());
    let first = authority.enqueue().await;
    let second = authority.enqueue().await;
    let session = Arc::new(PermissionSession::new(authority.clone()));

    let first_refresh = session.spawn_refresh();
    authority.wait_for_calls(1).await;
    let second_refresh = session.spawn_refresh();
    authority.wait_for_calls(2).await;

    let _ = first.send(Ok(permissions("viewer", &[])));
    let _ = first_refresh.await;
    assert!(session.state().is_loading());

    let _ = second.send(Ok(permissions("creator", &[])));
    let _ = second_refresh.await;
    assert_eq!(
        ready_role(&session.state()),
        Some(RoleRef::from(Role::Creator))
    );
}

#[tokio::test]
async fn teardown_discards_in_flight_result() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let session = Arc::new(PermissionSession::new(authority.clone()));

    let refresh = session.spawn_refresh();
    authority.wait_for_calls(1).await;
    session.teardown();

    let _ = response.send(Ok(permissions("root", &["*:*"])));
    let _ = refresh.await;

    assert!(session.is_closed());
    assert!(matches!(
        session.state(),
        PermissionState::Degraded(LoadFailure::SessionClosed)
    ));
}

#[tokio::test]
async fn refresh_after_teardown_skips_the_authority() {
    let authority = Arc::new(ScriptedAuthority::default());
    let session = PermissionSession::new(authority.clone());

    session.teardown();
    session.teardown();
    let state = session.refresh().await;

    assert_eq!(authority.calls(), 0);
    assert!(state.snapshot().is_none());
}

#[tokio::test]
async fn settled_waits_for_the_load_to_finish() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let session = Arc::new(PermissionSession::new(authority.clone()));

    let refresh = session.spawn_refresh();
    authority.wait_for_calls(1).await;

    let waiter = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.settled().await })
    };
    let _ = response.send(Ok(permissions("viewer", &[])));

    let settled = waiter.await.unwrap_or(PermissionState::Loading);
    let _ = refresh.await;
    assert!(!settled.is_loading());
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let authority = Arc::new(ScriptedAuthority::default());
    let response = authority.enqueue().await;
    let _ = response.send(Ok(permissions("viewer", &[])));

    let session = PermissionSession::new(authority);
    let mut receiver = session.subscribe();
    session.init().await;

    assert!(receiver.has_changed().unwrap_or(false));
    assert_eq!(receiver.borrow_and_update().as_str(), "ready");
}
