use axum::Json;
use axum::extract::{Extension, State};
use rolegate_application::Gate;
use rolegate_core::SessionCredential;
use tracing::debug;

use crate::dto::{GateEvaluationRequest, GateEvaluationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn evaluate_gate_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<SessionCredential>,
    Json(payload): Json<GateEvaluationRequest>,
) -> ApiResult<Json<GateEvaluationResponse>> {
    let gate = Gate::try_from(payload)?;
    let session = state.permission_sessions.session_for(&credential).await?;
    let decision = gate.evaluate(&session.state());
    debug!(
        outcome = ?decision.outcome,
        decided_by = decision.decided_by.as_str(),
        "evaluated gate"
    );

    Ok(Json(GateEvaluationResponse::from(decision)))
}
