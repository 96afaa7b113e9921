//! Default permission grants per role.
//!
//! Only used to derive a snapshot from a cached actor record when the live
//! snapshot from the permission authority is not consulted. The authority
//! remains the source of truth for fine-grained grants.

use crate::{Role, RoleRef, WILDCARD_PERMISSION};

const PLATFORM_ADMIN: &[&str] = &[WILDCARD_PERMISSION];

const AGENCY_ADMIN: &[&str] = &[
    "analytics:read",
    "billing:read",
    "brand:read",
    "brand:write",
    "campaign:delete",
    "campaign:read",
    "campaign:write",
    "content:approve",
    "content:read",
    "content:write",
    "crm:read",
    "crm:write",
    "discovery:read",
    "team:manage",
];

const AGENCY_MEMBER: &[&str] = &[
    "analytics:read",
    "brand:read",
    "campaign:read",
    "campaign:write",
    "content:read",
    "content:write",
    "crm:read",
    "crm:write",
    "discovery:read",
];

const BRAND_ADMIN: &[&str] = &[
    "analytics:read",
    "brand:read",
    "brand:write",
    "campaign:read",
    "campaign:write",
    "content:approve",
    "content:read",
    "team:manage",
];

const BRAND_MEMBER: &[&str] = &["analytics:read", "brand:read", "campaign:read", "content:read"];

const CREATOR: &[&str] = &["campaign:read", "content:read", "content:write"];

const VIEWER: &[&str] = &["campaign:read", "content:read"];

/// Returns the permissions a role carries by default.
///
/// Unknown roles carry nothing.
#[must_use]
pub fn role_default_permissions(role: &RoleRef) -> &'static [&'static str] {
    match role.known() {
        Some(Role::Root | Role::SuperAdmin) => PLATFORM_ADMIN,
        Some(Role::AgencyAdmin) => AGENCY_ADMIN,
        Some(Role::AgencyMember) => AGENCY_MEMBER,
        Some(Role::BrandAdmin) => BRAND_ADMIN,
        Some(Role::BrandMember) => BRAND_MEMBER,
        Some(Role::Creator) => CREATOR,
        Some(Role::Viewer) => VIEWER,
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::{PermissionKey, Role, RoleRef};

    use super::role_default_permissions;

    #[test]
    fn every_default_grant_is_a_well_formed_key() {
        for role in Role::all() {
            for permission in role_default_permissions(&RoleRef::from(*role)) {
                assert!(
                    PermissionKey::new(*permission).is_ok(),
                    "{role} grants malformed '{permission}'"
                );
            }
        }
    }

    #[test]
    fn unknown_role_has_no_defaults() {
        assert!(role_default_permissions(&RoleRef::parse("intern")).is_empty());
    }
}
