//! Pure permission and role decisions over an optional snapshot.
//!
//! Every function is total. An absent snapshot (still loading, or the load
//! failed) denies, and the super-admin flag is consulted before any grant.

use std::collections::BTreeMap;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{PermissionSnapshot, RoleRef};

/// Returns whether the snapshot grants `permission`.
#[must_use]
pub fn has_permission(snapshot: Option<&PermissionSnapshot>, permission: &str) -> bool {
    let Some(snapshot) = snapshot else {
        return false;
    };

    snapshot.is_super_admin() || snapshot.grants_wildcard() || snapshot.contains(permission)
}

/// Returns whether the snapshot grants every permission.
///
/// An empty list is satisfied by any present snapshot.
#[must_use]
pub fn has_all<P: AsRef<str>>(snapshot: Option<&PermissionSnapshot>, permissions: &[P]) -> bool {
    snapshot.is_some()
        && permissions
            .iter()
            .all(|permission| has_permission(snapshot, permission.as_ref()))
}

/// Returns whether the snapshot grants at least one permission.
#[must_use]
pub fn has_any<P: AsRef<str>>(snapshot: Option<&PermissionSnapshot>, permissions: &[P]) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(snapshot, permission.as_ref()))
}

/// Returns whether `actor` ranks at least as high as `required`.
///
/// `None` means no role requirement. Unknown actor roles rank lowest while
/// unknown required roles demand super-admin rank.
#[must_use]
pub fn meets_role(actor: &RoleRef, required: Option<&RoleRef>) -> bool {
    required.is_none_or(|required| actor.actor_rank() >= required.required_rank())
}

/// Returns whether the snapshot carries the super-admin bypass.
#[must_use]
pub fn is_super_admin(snapshot: Option<&PermissionSnapshot>) -> bool {
    snapshot.is_some_and(PermissionSnapshot::is_super_admin)
}

/// Ensures the snapshot grants `permission`.
pub fn require_permission(snapshot: Option<&PermissionSnapshot>, permission: &str) -> AppResult<()> {
    if snapshot.is_none() {
        return Err(AppError::Unauthorized(
            "permission snapshot is not available".to_owned(),
        ));
    }

    if has_permission(snapshot, permission) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "missing permission '{permission}'"
    )))
}

/// Evaluates several permissions at once, keyed by permission string.
#[must_use]
pub fn capabilities<P: AsRef<str>>(
    snapshot: Option<&PermissionSnapshot>,
    permissions: &[P],
) -> BTreeMap<String, bool> {
    permissions
        .iter()
        .map(|permission| {
            let permission = permission.as_ref();
            (permission.to_owned(), has_permission(snapshot, permission))
        })
        .collect()
}
