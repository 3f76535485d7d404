//! Contact list route.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use domain::models::contact::{contacts_from_value, Contact};
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactsResponse {
    contacts: Vec<Contact>,
}

/// GET /api/v1/devices/{owner}/{device}/contacts
///
/// One-shot read of the mirrored address book; nothing stays subscribed.
pub async fn list_contacts(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "contacts")?)
        .await?;

    Ok(Json(ContactsResponse {
        contacts: contacts_from_value(&payload),
    }))
}
