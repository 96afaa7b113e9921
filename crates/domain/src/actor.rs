//! Cached actor records.

use rolegate_core::OrganizationId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RoleRef;

/// Unique identifier for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Creates a new random actor identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an actor identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Locally cached actor record handed over by the auth subsystem at sign-in.
///
/// May lag behind the permission authority. It is trusted for role threshold
/// and approval checks only, never for fine-grained permission strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedActorRecord {
    id: ActorId,
    email: String,
    full_name: String,
    role: RoleRef,
    organization_id: Option<OrganizationId>,
    is_approved: bool,
}

impl CachedActorRecord {
    /// Creates a cached actor record.
    #[must_use]
    pub fn new(
        id: ActorId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: RoleRef,
        organization_id: Option<OrganizationId>,
        is_approved: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            role,
            organization_id,
            is_approved,
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the email captured at sign-in.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the display name captured at sign-in.
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Returns the role captured at sign-in.
    #[must_use]
    pub fn role(&self) -> &RoleRef {
        &self.role
    }

    /// Returns the organization, when the actor belongs to one.
    #[must_use]
    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.organization_id
    }

    /// Returns whether an administrator approved the account.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.is_approved
    }
}
