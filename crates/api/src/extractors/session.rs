//! Authenticated session extractor.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use shared::session::SessionClaims;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::session::SessionHandle;

/// The authenticated operator session for the current request.
///
/// Inserted by the `require_session` middleware; extracting it on a route
/// outside the protected group fails with 401.
#[derive(Clone)]
pub struct CurrentSession {
    pub claims: SessionClaims,
    pub handle: Arc<SessionHandle>,
}

impl CurrentSession {
    pub fn account_id(&self) -> &str {
        &self.claims.sub
    }

    /// Checks that this session may address the given account's devices.
    /// The owner session may address any account; everyone else only their
    /// own.
    pub fn authorize_account(&self, account_id: &str) -> Result<(), ApiError> {
        if self.handle.is_owner || self.account_id() == account_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You may only access your own devices".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))
    }
}
