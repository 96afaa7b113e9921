use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use rolegate_core::{AppError, SessionCredential};
use rolegate_domain::CachedActorRecord;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::{CreateSessionRequest, GenericMessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const SESSION_CREDENTIAL_KEY: &str = "session_credential";

/// Reads the credential stored at sign-in, if any.
pub async fn session_credential(session: &Session) -> ApiResult<Option<SessionCredential>> {
    session
        .get::<SessionCredential>(SESSION_CREDENTIAL_KEY)
        .await
        .map_err(|error| {
            ApiError::from(AppError::Internal(format!(
                "failed to read session credential: {error}"
            )))
        })
}

pub async fn create_session_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    let credential = SessionCredential::new(payload.access_token)?;
    let actor = payload.user.map(CachedActorRecord::try_from).transpose()?;

    if let Some(previous) = session_credential(&session).await?
        && previous != credential
    {
        end_gated_session(&state, &previous).await;
    }

    session.cycle_id().await.map_err(|error| {
        AppError::Internal(format!("failed to rotate session id: {error}"))
    })?;
    session
        .insert(SESSION_CREDENTIAL_KEY, credential.clone())
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;

    match actor {
        Some(actor) => {
            state
                .actor_record_cache
                .store_actor(&credential, actor)
                .await?;
        }
        None => state.actor_record_cache.evict_actor(&credential).await?,
    }

    state.permission_sessions.session_for(&credential).await?;
    info!("opened gated session");

    Ok((
        StatusCode::CREATED,
        Json(GenericMessageResponse {
            message: "session established".to_owned(),
        }),
    ))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    if let Some(credential) = session_credential(&session).await? {
        end_gated_session(&state, &credential).await;
    }

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn end_gated_session(state: &AppState, credential: &SessionCredential) {
    state.permission_sessions.end_session(credential).await;
    if let Err(error) = state.actor_record_cache.evict_actor(credential).await {
        warn!(error = %error, "failed to evict cached actor record");
    }
    info!("closed gated session");
}
