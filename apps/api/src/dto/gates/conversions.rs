use rolegate_application::{Gate, GateDecision, GateOutcome};
use rolegate_core::AppError;
use rolegate_domain::{PermissionKey, RoleRef};

use super::{GateEvaluationRequest, GateEvaluationResponse};

fn parse_keys(values: Vec<String>) -> Result<Vec<PermissionKey>, AppError> {
    values.into_iter().map(PermissionKey::new).collect()
}

impl TryFrom<GateEvaluationRequest> for Gate {
    type Error = AppError;

    fn try_from(request: GateEvaluationRequest) -> Result<Self, Self::Error> {
        let mut gate = Gate::new();
        if let Some(permission) = request.require {
            gate = gate.require(PermissionKey::new(permission)?);
        }
        if let Some(permissions) = request.require_all {
            gate = gate.require_all(parse_keys(permissions)?);
        }
        if let Some(permissions) = request.require_any {
            gate = gate.require_any(parse_keys(permissions)?);
        }
        if let Some(role) = request.require_role {
            gate = gate.require_role(RoleRef::parse(role.as_str()));
        }

        Ok(gate)
    }
}

impl From<GateDecision> for GateEvaluationResponse {
    fn from(decision: GateDecision) -> Self {
        let outcome = match decision.outcome {
            GateOutcome::Nothing => "nothing",
            GateOutcome::Content => "content",
            GateOutcome::Fallback => "fallback",
        };

        Self {
            outcome: outcome.to_owned(),
            decided_by: decision.decided_by.as_str().to_owned(),
        }
    }
}
