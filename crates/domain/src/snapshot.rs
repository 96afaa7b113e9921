use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CachedActorRecord, Role, RoleRef, WILDCARD_PERMISSION, role_default_permissions};

/// Point-in-time record of an actor's role, super-admin flag and granted
/// permission strings.
///
/// Snapshots are never mutated; a refresh produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    role: RoleRef,
    is_super_admin: bool,
    permissions: BTreeSet<String>,
    loaded_at: DateTime<Utc>,
}

impl PermissionSnapshot {
    /// Creates a snapshot stamped with the current time.
    #[must_use]
    pub fn new<I, P>(role: RoleRef, is_super_admin: bool, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            role,
            is_super_admin,
            permissions: permissions.into_iter().map(Into::into).collect(),
            loaded_at: Utc::now(),
        }
    }

    /// Derives a snapshot from a cached actor record's role.
    ///
    /// Grants come from the static role defaults and `root`/`super_admin`
    /// carry the super-admin flag. This is an approximation for low-latency
    /// route checks and never replaces the authority's snapshot.
    #[must_use]
    pub fn derived_from_actor(record: &CachedActorRecord) -> Self {
        let role = record.role().clone();
        let is_super_admin = matches!(role.known(), Some(Role::Root | Role::SuperAdmin));
        let permissions = role_default_permissions(&role).iter().copied();

        Self::new(role, is_super_admin, permissions)
    }

    /// Returns the actor's role.
    #[must_use]
    pub fn role(&self) -> &RoleRef {
        &self.role
    }

    /// Returns whether the actor bypasses every gate.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// Returns the granted permission strings.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns whether the exact permission string was granted.
    #[must_use]
    pub fn contains(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns whether the wildcard permission was granted.
    #[must_use]
    pub fn grants_wildcard(&self) -> bool {
        self.contains(WILDCARD_PERMISSION)
    }

    /// Returns when the snapshot was created.
    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
