//! Notification log route.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use domain::models::notification::NotificationRecord;
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationsResponse {
    notifications: Vec<NotificationRecord>,
}

/// GET /api/v1/notifications
///
/// Bounded tail of the session account's notification log. The log is
/// stored newest-last; the response is newest-first for display.
pub async fn list_notifications(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state
        .store
        .get_tail(
            &paths::notifications(session.account_id())?,
            state.config.console.notification_tail,
        )
        .await?;

    let mut notifications: Vec<NotificationRecord> = payload
        .as_object()
        .map(|entries| {
            entries
                .values()
                .filter_map(Value::as_str)
                .map(NotificationRecord::parse)
                .collect()
        })
        .unwrap_or_default();
    notifications.reverse();

    Ok(Json(NotificationsResponse { notifications }))
}
