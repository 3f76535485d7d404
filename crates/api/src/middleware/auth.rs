//! Session authentication middleware.
//!
//! Validates the Bearer session token and attaches the per-session console
//! state (indicators, watchers) to the request. Attachment is lazy: a valid
//! token whose session state is gone (process restart) gets a fresh state
//! with cleared indicators and freshly primed watchers.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::session::CurrentSession;

/// Middleware guarding all console routes.
pub async fn require_session(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    let claims = state
        .session_keys
        .verify(bearer.token())
        .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    let is_owner = state.config.is_owner(&claims.sub);
    let handle = state.sessions.attach(&state.store, &claims, is_owner).await;

    req.extensions_mut().insert(CurrentSession { claims, handle });
    Ok(next.run(req).await)
}
