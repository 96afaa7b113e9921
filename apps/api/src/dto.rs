mod common;
mod gates;
mod session;

pub use common::{GenericMessageResponse, GuardedPageResponse, HealthResponse};
pub use gates::{
    CapabilitiesQuery, CapabilitiesResponse, GateEvaluationRequest, GateEvaluationResponse,
    RequirePermissionQuery,
};
pub use session::{
    ActorRecordPayload, CreateSessionRequest, PermissionStateQuery, PermissionStateResponse,
};
