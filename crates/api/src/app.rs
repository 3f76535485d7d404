use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use realtime::RealtimeStore;
use shared::session::SessionKeys;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_session,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    auth, call_logs, contacts, devices, files, health, indicators, notifications, pages, sms,
    stats,
};
use crate::services::auth::AuthProvider;
use crate::services::preferences::PreferenceStore;
use crate::services::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RealtimeStore>,
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: Arc<SessionRegistry>,
    pub session_keys: SessionKeys,
    pub preferences: Arc<PreferenceStore>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(
    config: Config,
    store: Arc<dyn RealtimeStore>,
    auth_provider: Arc<dyn AuthProvider>,
) -> Router {
    let config = Arc::new(config);

    // Rate limiting applies to the credential endpoints only; 0 disables it
    let rate_limiter = (config.security.login_rate_limit_per_minute > 0).then(|| {
        Arc::new(RateLimiterState::new(
            config.security.login_rate_limit_per_minute,
        ))
    });

    let state = AppState {
        store,
        session_keys: SessionKeys::new(&config.session.secret),
        preferences: Arc::new(PreferenceStore::open(&config.console.preferences_path)),
        sessions: Arc::new(SessionRegistry::new()),
        auth: auth_provider,
        rate_limiter,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Credential endpoints (unauthenticated, rate limited)
    let credential_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Console routes (require a session token)
    let console_routes = Router::new()
        .route("/api/v1/auth/session", get(auth::current_session))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/pages", get(pages::list_pages))
        .route("/api/v1/pages/:page/open", post(pages::open_page))
        .route("/api/v1/indicators", get(indicators::get_indicators))
        .route("/api/v1/devices", get(devices::list_devices))
        .route("/api/v1/stats", get(stats::get_stats))
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route(
            "/api/v1/devices/:owner/:device",
            delete(devices::delete_device),
        )
        .route(
            "/api/v1/devices/:owner/:device/sms",
            get(sms::list_threads).post(sms::send_sms),
        )
        .route(
            "/api/v1/devices/:owner/:device/sms/:address/:message",
            delete(sms::delete_message),
        )
        .route(
            "/api/v1/devices/:owner/:device/contacts",
            get(contacts::list_contacts),
        )
        .route(
            "/api/v1/devices/:owner/:device/call-logs",
            get(call_logs::list_call_logs),
        )
        .route(
            "/api/v1/devices/:owner/:device/files",
            get(files::get_tree),
        )
        .route(
            "/api/v1/devices/:owner/:device/files/upload-request",
            post(files::request_upload),
        )
        .route(
            "/api/v1/devices/:owner/:device/files/download-request",
            post(files::request_download),
        )
        .route(
            "/api/v1/devices/:owner/:device/files/ready",
            get(files::list_ready),
        )
        .route(
            "/api/v1/devices/:owner/:device/files/ready/:id",
            delete(files::discard_ready),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(credential_routes)
        .merge(console_routes)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
