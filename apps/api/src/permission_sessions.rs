//! Live permission sessions, one per signed-in credential.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rolegate_application::{ActorRecordCache, PermissionAuthority, PermissionSession};
use rolegate_core::{AppError, AppResult, SessionCredential};
use rolegate_infrastructure::{HttpPermissionAuthority, StaticPermissionAuthority};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

use crate::api_config::PermissionAuthorityConfig;

/// Builds a permission authority bound to one credential.
#[derive(Clone)]
pub enum AuthorityProvider {
    Http {
        http_client: reqwest::Client,
        base_url: Url,
    },
    Static(StaticPermissionAuthority),
}

impl AuthorityProvider {
    pub fn from_config(config: &PermissionAuthorityConfig) -> AppResult<Self> {
        match config {
            PermissionAuthorityConfig::Http(http) => {
                let http_client = reqwest::Client::builder()
                    .timeout(http.timeout)
                    .build()
                    .map_err(|error| {
                        AppError::Internal(format!("failed to build HTTP client: {error}"))
                    })?;
                Ok(Self::Http {
                    http_client,
                    base_url: http.base_url.clone(),
                })
            }
            PermissionAuthorityConfig::Static(permissions) => Ok(Self::Static(
                StaticPermissionAuthority::granting(permissions.clone()),
            )),
        }
    }

    fn authority_for(
        &self,
        credential: &SessionCredential,
    ) -> AppResult<Arc<dyn PermissionAuthority>> {
        match self {
            Self::Http {
                http_client,
                base_url,
            } => Ok(Arc::new(HttpPermissionAuthority::new(
                http_client.clone(),
                base_url,
                credential.clone(),
            )?)),
            Self::Static(authority) => Ok(Arc::new(authority.clone())),
        }
    }
}

struct RegistryEntry {
    session: Arc<PermissionSession>,
    expires_at: Instant,
}

/// Registry of live permission sessions keyed by credential.
///
/// Entries expire after `idle_ttl` without a lookup, mirroring the cookie
/// session's inactivity expiry. Expired entries are torn down and their
/// cached actor records evicted by [`Self::sweep_expired`].
#[derive(Clone)]
pub struct PermissionSessionRegistry {
    provider: AuthorityProvider,
    actor_record_cache: Arc<dyn ActorRecordCache>,
    idle_ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionCredential, RegistryEntry>>>,
}

impl PermissionSessionRegistry {
    pub fn new(
        provider: AuthorityProvider,
        actor_record_cache: Arc<dyn ActorRecordCache>,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            actor_record_cache,
            idle_ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the live session for `credential`, starting its first load
    /// in the background when it does not exist yet. Every lookup extends
    /// the entry's idle expiry.
    pub async fn session_for(
        &self,
        credential: &SessionCredential,
    ) -> AppResult<Arc<PermissionSession>> {
        let now = Instant::now();
        let expires_at = now.checked_add(self.idle_ttl).unwrap_or(now);
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.get_mut(credential)
            && entry.expires_at > now
        {
            entry.expires_at = expires_at;
            return Ok(Arc::clone(&entry.session));
        }

        let session = Arc::new(PermissionSession::new(
            self.provider.authority_for(credential)?,
        ));
        if let Some(stale) = sessions.insert(
            credential.clone(),
            RegistryEntry {
                session: Arc::clone(&session),
                expires_at,
            },
        ) {
            stale.session.teardown();
        }
        drop(sessions);

        let initializing = Arc::clone(&session);
        tokio::spawn(async move {
            initializing.init().await;
        });
        debug!("started permission session");

        Ok(session)
    }

    /// Tears down and forgets the session for `credential`.
    pub async fn end_session(&self, credential: &SessionCredential) {
        if let Some(entry) = self.sessions.write().await.remove(credential) {
            entry.session.teardown();
            debug!("ended permission session");
        }
    }

    /// Tears down every session idle past its expiry and evicts the matching
    /// cached actor records. Returns how many sessions were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<(SessionCredential, Arc<PermissionSession>)> = {
            let mut sessions = self.sessions.write().await;
            let credentials: Vec<SessionCredential> = sessions
                .iter()
                .filter(|(_, entry)| entry.expires_at <= now)
                .map(|(credential, _)| credential.clone())
                .collect();
            credentials
                .into_iter()
                .filter_map(|credential| {
                    sessions
                        .remove(&credential)
                        .map(|entry| (credential, entry.session))
                })
                .collect()
        };

        for (credential, session) in &expired {
            session.teardown();
            if let Err(error) = self.actor_record_cache.evict_actor(credential).await {
                warn!(error = %error, "failed to evict expired actor record");
            }
        }

        if !expired.is_empty() {
            let live = self.live_sessions().await;
            info!(
                expired = expired.len(),
                live = live,
                "swept idle permission sessions"
            );
        }

        expired.len()
    }

    /// Returns how many sessions the registry currently holds.
    pub async fn live_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Sweeps expired sessions every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.sweep_expired().await;
            }
        })
    }
}
