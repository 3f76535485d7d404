//! Call log route.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use domain::models::call_log::{call_logs_from_value, CallLogEntry};
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallLogsResponse {
    call_logs: Vec<CallLogEntry>,
}

/// GET /api/v1/devices/{owner}/{device}/call-logs
///
/// One-shot read of the mirrored call history.
pub async fn list_call_logs(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "call_logs")?)
        .await?;

    Ok(Json(CallLogsResponse {
        call_logs: call_logs_from_value(&payload),
    }))
}
