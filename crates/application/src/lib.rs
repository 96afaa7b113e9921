//! Application services and ports.

#![forbid(unsafe_code)]

mod access_evaluator;
mod access_gate;
mod permission_ports;
mod permission_session;
mod route_guard;

pub use access_evaluator::{
    capabilities, has_all, has_any, has_permission, is_super_admin, meets_role,
    require_permission,
};
pub use access_gate::{Gate, GateDecision, GateOutcome, GateRule};
pub use permission_ports::{ActorRecordCache, EffectivePermissions, PermissionAuthority};
pub use permission_session::{LoadFailure, PermissionSession, PermissionState};
pub use route_guard::{
    GuardDecision, GuardPaths, GuardRedirect, RedirectReason, RouteGuard, RouteGuardService,
    RouteRequirement, RouteTable,
};
