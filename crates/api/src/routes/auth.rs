//! Operator authentication routes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shared::validation::{validate_email, validate_password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::services::auth::AuthError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Extends the session lifetime to the remember TTL.
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub account_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/v1/auth/login
///
/// Verifies credentials against the identity provider and issues a session
/// token. Any provider-side failure maps to one generic message so the
/// endpoint cannot be used to probe which emails exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let user = state
        .auth
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|err| {
            warn!(error = %err, "login rejected");
            ApiError::Unauthorized("Invalid email or password".to_string())
        })?;

    let ttl = if payload.remember {
        state.config.session.remember_ttl_secs
    } else {
        state.config.session.ttl_secs
    };

    let issued = state
        .session_keys
        .issue(&user.account_id, &user.email, ttl)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // Attach console state eagerly so the watchers prime their baseline
    // before the first page request arrives.
    let is_owner = state.config.is_owner(&user.account_id);
    state
        .sessions
        .attach(&state.store, &issued.claims, is_owner)
        .await;

    info!(account_id = %user.account_id, "operator logged in");

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            token: issued.token,
            account_id: user.account_id,
            email: user.email,
            expires_at: Utc
                .timestamp_opt(issued.claims.exp, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }),
    ))
}

/// POST /api/v1/auth/register
///
/// Creates an operator account when the identity provider supports it.
/// Only a duplicate email gets a specific message; everything else is
/// generic.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let user = state
        .auth
        .register(&payload.email, &payload.password)
        .await
        .map_err(|err| match err {
            AuthError::EmailInUse => ApiError::Conflict("This email is already in use".to_string()),
            other => {
                warn!(error = %other, "registration rejected");
                ApiError::Validation("Error creating account. Please try again".to_string())
            }
        })?;

    info!(account_id = %user.account_id, "operator account created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "accountId": user.account_id,
            "email": user.email,
        })),
    ))
}

/// GET /api/v1/auth/session
///
/// Profile data for the signed-in operator.
pub async fn current_session(session: CurrentSession) -> impl IntoResponse {
    Json(serde_json::json!({
        "accountId": session.account_id(),
        "email": session.claims.email,
        "accountType": "Operator",
        "owner": session.handle.is_owner,
    }))
}

/// POST /api/v1/auth/logout
///
/// Tears down the session's console state and detaches its subscriptions.
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> impl IntoResponse {
    state.sessions.detach(&session.claims.jti);
    StatusCode::NO_CONTENT
}
