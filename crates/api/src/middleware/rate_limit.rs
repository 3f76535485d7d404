//! Rate limiting middleware for the authentication endpoints.
//!
//! Login and register are the only unauthenticated write paths, so they
//! get per-client limits keyed by peer address.

use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Type alias for the rate limiter used per client.
type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests, one limiter per client key.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<ClientRateLimiter>>>,
    limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            limit_per_minute,
        }
    }

    fn get_or_create_limiter(&self, key: &str) -> Arc<ClientRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(key) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();
        if let Some(limiter) = limiters.get(key) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.limit_per_minute).unwrap_or(NonZeroU32::new(10).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(key.to_string(), limiter.clone());
        limiter
    }

    /// Check whether a request from the given client should be allowed.
    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        match self.get_or_create_limiter(key).check() {
            Ok(_) => Ok(()),
            Err(_) => Err(ApiError::RateLimited),
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("limit_per_minute", &self.limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that applies per-client rate limiting.
///
/// Disabled entirely when the configured limit is 0 (no limiter state).
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let key = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let Err(err) = limiter.check(&key) {
        return err.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_until_quota_exhausted() {
        let state = RateLimiterState::new(3);
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());
        assert!(matches!(state.check("10.0.0.1"), Err(ApiError::RateLimited)));
    }

    #[test]
    fn test_clients_have_independent_quotas() {
        let state = RateLimiterState::new(1);
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.2").is_ok());
        assert!(state.check("10.0.0.1").is_err());
    }
}
