//! Rolegate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod auth;
mod dto;
mod error;
mod guarded_routes;
mod handlers;
mod middleware;
mod permission_sessions;
mod state;

use std::sync::Arc;

use rolegate_application::{ActorRecordCache, RouteGuard, RouteGuardService};
use rolegate_core::AppError;
use rolegate_infrastructure::InMemoryActorRecordCache;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::permission_sessions::{AuthorityProvider, PermissionSessionRegistry};
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let idle_seconds = i64::try_from(config.session_idle_timeout.as_secs()).map_err(|error| {
        AppError::Validation(format!("SESSION_IDLE_TIMEOUT_SECONDS is too large: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(idle_seconds)));

    let actor_record_cache: Arc<dyn ActorRecordCache> = Arc::new(InMemoryActorRecordCache::new(
        config.session_idle_timeout,
    ));
    let route_guard_service = RouteGuardService::new(
        RouteGuard::new(config.guard_paths.clone()),
        guarded_routes::default_route_table()?,
        actor_record_cache.clone(),
    );
    let permission_sessions = PermissionSessionRegistry::new(
        AuthorityProvider::from_config(&config.permission_authority)?,
        actor_record_cache.clone(),
        config.session_idle_timeout,
    );
    permission_sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let app_state = AppState {
        route_guard_service,
        actor_record_cache,
        permission_sessions,
        frontend_url: config.frontend_url.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rolegate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
