//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod actor;
mod grants;
mod permission;
mod role;
mod snapshot;

pub use actor::{ActorId, CachedActorRecord};
pub use grants::role_default_permissions;
pub use permission::{PermissionKey, WILDCARD_PERMISSION};
pub use role::{Role, RoleRef, UNKNOWN_ACTOR_RANK, UNKNOWN_REQUIRED_RANK};
pub use snapshot::PermissionSnapshot;
