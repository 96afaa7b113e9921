use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Actor record handed over by the auth subsystem at sign-in.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/actor-record-payload.ts"
)]
pub struct ActorRecordPayload {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub organization_id: Option<String>,
    pub is_approved: bool,
}

/// Incoming payload that opens a gated session.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-session-request.ts"
)]
pub struct CreateSessionRequest {
    pub access_token: String,
    pub user: Option<ActorRecordPayload>,
}

/// Query options for reading the live permission state.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionStateQuery {
    /// Waits for an in-flight load to finish before answering.
    #[serde(default)]
    pub wait: bool,
}

/// API representation of the live permission state.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-state-response.ts"
)]
pub struct PermissionStateResponse {
    pub state: String,
    pub failure: Option<String>,
    pub role: Option<String>,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub loaded_at: Option<String>,
}
