//! SMS thread routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use domain::models::command::DeviceCommand;
use domain::models::sms::{conversations_from_value, Conversation};
use realtime::paths;
use shared::validation::{validate_sms_message, validate_sms_recipient};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::middleware::metrics::record_command_pushed;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreadsResponse {
    conversations: Vec<Conversation>,
}

/// GET /api/v1/devices/{owner}/{device}/sms
///
/// Mirrored SMS threads, named senders first, most recent activity next.
pub async fn list_threads(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "sms")?)
        .await?;

    Ok(Json(ThreadsResponse {
        conversations: conversations_from_value(&payload),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    pub recipient: String,
    pub message: String,
}

/// POST /api/v1/devices/{owner}/{device}/sms
///
/// Queues a send-SMS command for the device agent. Invalid input is
/// rejected before anything reaches the store.
pub async fn send_sms(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
    Json(payload): Json<SendSmsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;
    validate_sms_recipient(&payload.recipient)?;
    validate_sms_message(&payload.message)?;

    let command = DeviceCommand::send_sms(&payload.recipient, &payload.message);
    let command_id = state
        .store
        .push(
            &paths::device_node(&owner, &device, "commands")?,
            serde_json::to_value(&command).map_err(|e| ApiError::Internal(e.to_string()))?,
        )
        .await?;

    record_command_pushed("sendsms");
    info!(account_id = %owner, device_key = %device, command_id = %command_id, "sms command queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"commandId": command_id})),
    ))
}

/// DELETE /api/v1/devices/{owner}/{device}/sms/{address}/{message}
pub async fn delete_message(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device, address, message)): Path<(String, String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    state
        .store
        .remove(&paths::sms_message(&owner, &device, &address, &message)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
