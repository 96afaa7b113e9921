use rolegate_application::PermissionState;
use rolegate_core::{AppError, OrganizationId};
use rolegate_domain::{ActorId, CachedActorRecord, RoleRef};
use uuid::Uuid;

use super::{ActorRecordPayload, PermissionStateResponse};

impl TryFrom<ActorRecordPayload> for CachedActorRecord {
    type Error = AppError;

    fn try_from(payload: ActorRecordPayload) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(payload.id.as_str())
            .map(ActorId::from_uuid)
            .map_err(|error| AppError::Validation(format!("invalid user id: {error}")))?;
        let organization_id = payload
            .organization_id
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Uuid::parse_str(value.as_str())
                    .map(OrganizationId::from_uuid)
                    .map_err(|error| {
                        AppError::Validation(format!("invalid organization id: {error}"))
                    })
            })
            .transpose()?;

        Ok(CachedActorRecord::new(
            id,
            payload.email,
            payload.full_name,
            RoleRef::parse(payload.role.as_str()),
            organization_id,
            payload.is_approved,
        ))
    }
}

impl From<&PermissionState> for PermissionStateResponse {
    fn from(state: &PermissionState) -> Self {
        let failure = match state {
            PermissionState::Degraded(failure) => Some(failure.as_str().to_owned()),
            PermissionState::Loading | PermissionState::Ready(_) => None,
        };
        let snapshot = state.snapshot();

        Self {
            state: state.as_str().to_owned(),
            failure,
            role: snapshot.map(|snapshot| snapshot.role().to_string()),
            is_super_admin: snapshot.is_some_and(|snapshot| snapshot.is_super_admin()),
            permissions: snapshot
                .map(|snapshot| snapshot.permissions().iter().cloned().collect())
                .unwrap_or_default(),
            loaded_at: snapshot.map(|snapshot| snapshot.loaded_at().to_rfc3339()),
        }
    }
}
