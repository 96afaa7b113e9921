use std::sync::Arc;

use rolegate_application::{ActorRecordCache, RouteGuardService};

use crate::permission_sessions::PermissionSessionRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub route_guard_service: RouteGuardService,
    pub actor_record_cache: Arc<dyn ActorRecordCache>,
    pub permission_sessions: PermissionSessionRegistry,
    pub frontend_url: String,
}
