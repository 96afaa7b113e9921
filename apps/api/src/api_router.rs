use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use rolegate_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::guarded_routes::GUARDED_PREFIX;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let session_routes = Router::new()
        .route(
            "/api/session/permissions",
            get(handlers::session::permission_state_handler),
        )
        .route(
            "/api/session/permissions/refresh",
            post(handlers::session::refresh_permissions_handler),
        )
        .route(
            "/api/session/permissions/require",
            get(handlers::session::require_permission_handler),
        )
        .route(
            "/api/session/capabilities",
            get(handlers::session::capabilities_handler),
        )
        .route(
            "/api/gates/evaluate",
            post(handlers::gates::evaluate_gate_handler),
        )
        .route_layer(from_fn(middleware::require_credential));

    let page_routes = Router::new()
        .route(GUARDED_PREFIX, get(handlers::pages::guarded_page_handler))
        .route(
            "/app/{*page}",
            get(handlers::pages::guarded_page_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::guard_routes,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/session", post(auth::create_session_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(session_routes)
        .merge(page_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
