//! Page routes protected by the route guard.

use rolegate_application::{RouteRequirement, RouteTable};
use rolegate_core::AppResult;
use rolegate_domain::{PermissionKey, Role};

/// Prefix under which every page route is guarded.
pub const GUARDED_PREFIX: &str = "/app";

/// Builds the route table for the workspace pages.
pub fn default_route_table() -> AppResult<RouteTable> {
    Ok(RouteTable::new()
        .protect(GUARDED_PREFIX, RouteRequirement::authenticated())
        .protect("/app/campaigns", permission("campaign:read")?)
        .protect("/app/content", permission("content:read")?)
        .protect("/app/crm", permission("crm:read")?.with_fallback(GUARDED_PREFIX))
        .protect("/app/discovery", permission("discovery:read")?)
        .protect(
            "/app/team",
            permission("team:manage")?.with_role(Role::BrandAdmin),
        )
        .protect(
            "/app/billing",
            permission("billing:read")?.with_role(Role::AgencyAdmin),
        )
        .protect(
            "/app/admin",
            RouteRequirement::authenticated().with_role(Role::SuperAdmin),
        ))
}

fn permission(value: &str) -> AppResult<RouteRequirement> {
    Ok(RouteRequirement::authenticated().with_permission(PermissionKey::new(value)?))
}
