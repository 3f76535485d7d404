//! Fleet statistics route.

use axum::{extract::State, response::IntoResponse, Json};

use domain::services::snapshot::{normalize_account, normalize_owner};
use domain::services::stats::fleet_stats;
use realtime::paths;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

/// GET /api/v1/stats
///
/// Aggregate counters for the clients and connections pages, recomputed
/// from the current snapshot on every request. The owner's own devices are
/// excluded from the fleet-wide totals, like the device listing.
pub async fn get_stats(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = session.account_id();

    let devices = if session.handle.is_owner {
        let payload = state.store.get(&paths::accounts_root()).await?;
        let own_prefix = format!("{}/", account_id);
        let mut devices = normalize_owner(&payload);
        devices.retain(|key, _| !key.starts_with(&own_prefix));
        devices
    } else {
        let payload = state.store.get(&paths::devices(account_id)?).await?;
        normalize_account(&payload)
    };

    Ok(Json(fleet_stats(&devices)))
}
