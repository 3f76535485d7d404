//! Sidebar badge indicator route.

use axum::{response::IntoResponse, Json};

use crate::extractors::CurrentSession;

/// GET /api/v1/indicators
///
/// Current badge state for this session. Flags are raised by the session's
/// watchers and cleared when the matching page is opened.
pub async fn get_indicators(session: CurrentSession) -> impl IntoResponse {
    Json(session.handle.indicators())
}
