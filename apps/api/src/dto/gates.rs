use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Gate conditions submitted for evaluation against the caller's session.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gate-evaluation-request.ts"
)]
pub struct GateEvaluationRequest {
    #[serde(default)]
    pub require: Option<String>,
    #[serde(default)]
    pub require_all: Option<Vec<String>>,
    #[serde(default)]
    pub require_any: Option<Vec<String>>,
    #[serde(default)]
    pub require_role: Option<String>,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gate-evaluation-response.ts"
)]
pub struct GateEvaluationResponse {
    pub outcome: String,
    pub decided_by: String,
}

/// Comma-separated permission list to evaluate.
#[derive(Debug, Default, Deserialize)]
pub struct CapabilitiesQuery {
    #[serde(default)]
    pub permissions: String,
}

/// Single permission an endpoint caller must hold.
#[derive(Debug, Deserialize)]
pub struct RequirePermissionQuery {
    pub permission: String,
}

/// Capability flags keyed by permission string.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/capabilities-response.ts"
)]
pub struct CapabilitiesResponse {
    pub state: String,
    pub is_super_admin: bool,
    pub capabilities: BTreeMap<String, bool>,
}
