use async_trait::async_trait;
use rolegate_core::{AppResult, SessionCredential};
use rolegate_domain::{CachedActorRecord, PermissionSnapshot, RoleRef};
use serde::{Deserialize, Serialize};

/// Effective permissions as returned by the permission authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissions {
    /// Role string; may name a role outside the hierarchy table.
    pub role: String,
    /// Whether the actor bypasses every gate.
    #[serde(default)]
    pub is_super_admin: bool,
    /// Granted permission strings.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl EffectivePermissions {
    /// Freezes the response into an immutable snapshot.
    #[must_use]
    pub fn into_snapshot(self) -> PermissionSnapshot {
        PermissionSnapshot::new(
            RoleRef::from(self.role),
            self.is_super_admin,
            self.permissions,
        )
    }
}

/// Port for the external authority that issues permission snapshots.
///
/// Implementations report a missing or rejected session as
/// `AppError::Unauthorized` and transport or upstream failures as
/// `AppError::Unavailable`. Timeouts belong to the implementation's client.
#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    /// Fetches the current actor's effective permissions.
    async fn fetch_effective_permissions(&self) -> AppResult<EffectivePermissions>;
}

/// Port for the locally cached actor records written at sign-in.
#[async_trait]
pub trait ActorRecordCache: Send + Sync {
    /// Returns the cached record for a credential, if one was stored.
    async fn find_actor(&self, credential: &SessionCredential)
    -> AppResult<Option<CachedActorRecord>>;

    /// Stores or replaces the record for a credential.
    async fn store_actor(
        &self,
        credential: &SessionCredential,
        record: CachedActorRecord,
    ) -> AppResult<()>;

    /// Removes the record for a credential.
    async fn evict_actor(&self, credential: &SessionCredential) -> AppResult<()>;
}
