use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use rolegate_application::{capabilities, require_permission};
use rolegate_core::SessionCredential;
use rolegate_domain::PermissionKey;

use crate::api_config::split_list;
use crate::dto::{
    CapabilitiesQuery, CapabilitiesResponse, PermissionStateQuery, PermissionStateResponse,
    RequirePermissionQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn permission_state_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<SessionCredential>,
    Query(query): Query<PermissionStateQuery>,
) -> ApiResult<Json<PermissionStateResponse>> {
    let session = state.permission_sessions.session_for(&credential).await?;
    let permission_state = if query.wait {
        session.settled().await
    } else {
        session.state()
    };

    Ok(Json(PermissionStateResponse::from(&permission_state)))
}

pub async fn refresh_permissions_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<SessionCredential>,
) -> ApiResult<Json<PermissionStateResponse>> {
    let session = state.permission_sessions.session_for(&credential).await?;
    let permission_state = session.refresh().await;

    Ok(Json(PermissionStateResponse::from(&permission_state)))
}

pub async fn capabilities_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<SessionCredential>,
    Query(query): Query<CapabilitiesQuery>,
) -> ApiResult<Json<CapabilitiesResponse>> {
    let session = state.permission_sessions.session_for(&credential).await?;
    let permission_state = session.state();
    let snapshot = permission_state.snapshot();
    let permissions = split_list(query.permissions.as_str());

    Ok(Json(CapabilitiesResponse {
        state: permission_state.as_str().to_owned(),
        is_super_admin: snapshot.is_some_and(|snapshot| snapshot.is_super_admin()),
        capabilities: capabilities(snapshot, permissions.as_slice()),
    }))
}

/// Answers `204` when the settled snapshot grants the permission, `401`
/// when there is no snapshot and `403` when the grant is missing.
pub async fn require_permission_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<SessionCredential>,
    Query(query): Query<RequirePermissionQuery>,
) -> ApiResult<StatusCode> {
    let permission = PermissionKey::new(query.permission)?;
    let session = state.permission_sessions.session_for(&credential).await?;
    let permission_state = session.settled().await;

    require_permission(permission_state.snapshot(), permission.as_str())?;
    Ok(StatusCode::NO_CONTENT)
}
