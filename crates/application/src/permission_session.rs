//! Lifecycle of the live permission snapshot.
//!
//! A [`PermissionSession`] loads a snapshot from the injected
//! [`PermissionAuthority`] and publishes every transition through a
//! `tokio::sync::watch` channel. The snapshot is swapped as a whole, so
//! readers see either the previous or the next complete state.
//!
//! Each load is tagged with a generation number. Only the most recently
//! started load may publish; a slower, earlier load that finishes afterwards
//! is dropped. Earlier requests are not cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rolegate_core::{AppError, AppResult};
use rolegate_domain::PermissionSnapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{EffectivePermissions, PermissionAuthority};

/// Why a settled session holds no snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The authority rejected or did not recognise the session.
    Unauthenticated,
    /// The authority could not be reached or answered with an error.
    Unavailable,
    /// The session was torn down.
    SessionClosed,
}

impl LoadFailure {
    /// Returns a stable transport value for this failure.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unavailable => "unavailable",
            Self::SessionClosed => "session_closed",
        }
    }
}

/// Observable state of a [`PermissionSession`].
#[derive(Debug, Clone)]
pub enum PermissionState {
    /// A load is in flight.
    Loading,
    /// The last load succeeded.
    Ready(Arc<PermissionSnapshot>),
    /// The last load finished without a snapshot.
    Degraded(LoadFailure),
}

impl PermissionState {
    /// Returns the snapshot when one is loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&PermissionSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot.as_ref()),
            Self::Loading | Self::Degraded(_) => None,
        }
    }

    /// Returns whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns a stable transport value for the state kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Degraded(_) => "degraded",
        }
    }
}

/// Owns the live permission snapshot for one signed-in actor.
pub struct PermissionSession {
    authority: Arc<dyn PermissionAuthority>,
    state: watch::Sender<PermissionState>,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl PermissionSession {
    /// Creates a session in the `Loading` state. Call [`Self::init`] to
    /// issue the first load.
    #[must_use]
    pub fn new(authority: Arc<dyn PermissionAuthority>) -> Self {
        let (state, _) = watch::channel(PermissionState::Loading);
        Self {
            authority,
            state,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Issues the first load and returns the resulting state.
    pub async fn init(&self) -> PermissionState {
        debug!("initializing permission session");
        self.load().await
    }

    /// Re-enters `Loading`, issues a new load and returns the state once it
    /// completes. If a later refresh started in the meantime, the returned
    /// state is whatever the session currently holds.
    pub async fn refresh(&self) -> PermissionState {
        debug!("refreshing permission session");
        self.load().await
    }

    /// Runs [`Self::refresh`] on the tokio runtime.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<PermissionState> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.refresh().await })
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> PermissionState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    /// Waits until the session leaves `Loading`.
    pub async fn settled(&self) -> PermissionState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Closes the session. In-flight loads are discarded when they finish and
    /// further refreshes do nothing.
    pub fn teardown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.state
            .send_replace(PermissionState::Degraded(LoadFailure::SessionClosed));
        debug!("permission session torn down");
    }

    /// Returns whether [`Self::teardown`] was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn load(&self) -> PermissionState {
        let Some(generation) = self.begin_load() else {
            return self.state();
        };

        let outcome = self.authority.fetch_effective_permissions().await;
        self.complete_load(generation, outcome);
        self.state()
    }

    fn begin_load(&self) -> Option<u64> {
        let mut started = None;
        self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst) {
                return false;
            }

            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            started = Some(generation);
            *state = PermissionState::Loading;
            true
        });
        started
    }

    fn complete_load(&self, generation: u64, outcome: AppResult<EffectivePermissions>) {
        let next = match outcome {
            Ok(permissions) => {
                let snapshot = permissions.into_snapshot();
                info!(
                    generation,
                    role = %snapshot.role(),
                    is_super_admin = snapshot.is_super_admin(),
                    permission_count = snapshot.permissions().len(),
                    "permission snapshot loaded"
                );
                PermissionState::Ready(Arc::new(snapshot))
            }
            Err(error) => {
                let failure = match error {
                    AppError::Unauthorized(_) => LoadFailure::Unauthenticated,
                    _ => LoadFailure::Unavailable,
                };
                warn!(
                    generation,
                    failure = failure.as_str(),
                    error = %error,
                    "permission snapshot load failed"
                );
                PermissionState::Degraded(failure)
            }
        };

        let published = self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst)
                || self.generation.load(Ordering::SeqCst) != generation
            {
                return false;
            }

            *state = next;
            true
        });

        if !published {
            debug!(generation, "discarded superseded permission load");
        }
    }
}

#[cfg(test)]
mod tests;
