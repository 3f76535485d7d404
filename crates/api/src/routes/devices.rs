//! Device listing and lifecycle routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;

use domain::models::device::{split_device_key, DeviceCard};
use domain::services::snapshot::{normalize_account, normalize_owner};
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListResponse {
    devices: Vec<DeviceCard>,
}

/// GET /api/v1/devices
///
/// Device cards for the session's visible fleet. The owner sees every
/// account's devices except their own; everyone else sees their own.
pub async fn list_devices(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = session.account_id();

    let devices = if session.handle.is_owner {
        let payload = state.store.get(&paths::accounts_root()).await?;
        normalize_owner(&payload)
            .iter()
            .filter_map(|(key, record)| {
                let (owner_id, device_key) = split_device_key(key, account_id);
                // The owner's own enrollments are not fleet clients.
                (owner_id != account_id)
                    .then(|| DeviceCard::from_record(&owner_id, &device_key, record))
            })
            .collect()
    } else {
        let payload = state.store.get(&paths::devices(account_id)?).await?;
        normalize_account(&payload)
            .iter()
            .map(|(key, record)| DeviceCard::from_record(account_id, key, record))
            .collect()
    };

    Ok(Json(DeviceListResponse { devices }))
}

/// DELETE /api/v1/devices/{owner}/{device}
///
/// Removes the whole device subtree. The operator-facing confirmation
/// happens client-side; this endpoint is the destructive step.
pub async fn delete_device(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    state.store.remove(&paths::device(&owner, &device)?).await?;

    info!(account_id = %owner, device_key = %device, "device removed");
    Ok(StatusCode::NO_CONTENT)
}
