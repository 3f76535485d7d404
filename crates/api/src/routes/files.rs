//! File manager routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use domain::models::command::{DownloadRequest, UploadRequest};
use domain::models::file_tree::{
    parse_children, resolve, upload_file_db_path, upload_file_path, FileNodeView,
};
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileTreeResponse {
    entries: Vec<FileNodeView>,
}

/// GET /api/v1/devices/{owner}/{device}/files
///
/// The device's full mirrored tree, with display names unescaped.
pub async fn get_tree(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "files")?)
        .await?;

    let entries = parse_children(&payload)
        .iter()
        .map(|(name, node)| FileNodeView::from_node(name, node))
        .collect();

    Ok(Json(FileTreeResponse { entries }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestBody {
    /// Directory segments from the tree root, store-escaped.
    #[serde(default)]
    pub path: Vec<String>,
    /// File name, store-escaped.
    pub name: String,
}

/// POST /api/v1/devices/{owner}/{device}/files/upload-request
///
/// Asks the agent to upload one remote-content file. The request is keyed
/// by file name so repeated clicks collapse into one pending transfer.
pub async fn request_upload(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
    Json(body): Json<UploadRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "files")?)
        .await?;
    let tree = parse_children(&payload);

    let mut segments = body.path.clone();
    segments.push(body.name.clone());
    let node = resolve(&tree, &segments)
        .ok_or_else(|| ApiError::NotFound("No such file in the device tree".to_string()))?;
    let content_uri = node.content_uri().ok_or_else(|| {
        ApiError::Validation("File has no remote content to upload".to_string())
    })?;

    let request = UploadRequest {
        content_uri: content_uri.to_string(),
        file_path: upload_file_path(&device, &body.path, &body.name),
        file_db_path: upload_file_db_path(&owner, &device, &body.path, &body.name),
    };

    state
        .store
        .set(
            &paths::upload_request(&owner, &device, &body.name)?,
            serde_json::to_value(&request).map_err(|e| ApiError::Internal(e.to_string()))?,
        )
        .await?;

    info!(account_id = %owner, device_key = %device, name = %body.name, "upload requested");
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/devices/{owner}/{device}/files/download-request
///
/// Asks the agent to stage a file for operator download.
pub async fn request_download(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
    Json(request): Json<DownloadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    if request.content_uri.is_empty() || request.name.is_empty() {
        return Err(ApiError::Validation(
            "contentUri and name are required".to_string(),
        ));
    }

    let request_id = state
        .store
        .push(
            &paths::device_node(&owner, &device, "upload_requests")?,
            serde_json::to_value(&request).map_err(|e| ApiError::Internal(e.to_string()))?,
        )
        .await?;

    info!(account_id = %owner, device_key = %device, name = %request.name, "download requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"requestId": request_id})),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyFile {
    id: String,
    name: String,
    download_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyFilesResponse {
    files: Vec<ReadyFile>,
}

/// GET /api/v1/devices/{owner}/{device}/files/ready
///
/// Staged transfers that have finished and carry a download URL. Entries
/// still in flight (no URL yet) are not listed.
pub async fn list_ready(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    let payload = state
        .store
        .get(&paths::device_node(&owner, &device, "uploaded_files")?)
        .await?;

    let files = payload
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(id, file)| {
                    let url = file.get("downloadUrl").and_then(Value::as_str)?;
                    Some(ReadyFile {
                        id: id.clone(),
                        name: file
                            .get("name")
                            .and_then(Value::as_str)
                            .unwrap_or(id)
                            .to_string(),
                        download_url: url.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(ReadyFilesResponse { files }))
}

/// DELETE /api/v1/devices/{owner}/{device}/files/ready/{id}
///
/// Post-download cleanup of a staged transfer record.
pub async fn discard_ready(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((owner, device, id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    session.authorize_account(&owner)?;

    state
        .store
        .remove(&paths::uploaded_file(&owner, &device, &id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
