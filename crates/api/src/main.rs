use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use fleet_console_api::services::auth::{AuthProvider, BootstrapAuthProvider, HttpAuthProvider};
use fleet_console_api::{app, config, middleware};
use realtime::{MemoryStore, RealtimeStore, RestStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting Fleet Console v{}", env!("CARGO_PKG_VERSION"));

    // Connect the realtime store backend
    let store: Arc<dyn RealtimeStore> = match config.store.backend.as_str() {
        "rest" => Arc::new(RestStore::new(
            &config.store.base_url,
            Duration::from_secs(config.store.poll_interval_secs),
        )),
        _ => {
            info!("Using embedded in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Select the authentication provider
    let auth: Arc<dyn AuthProvider> = match config.auth.provider.as_str() {
        "http" => Arc::new(HttpAuthProvider::new(&config.auth.endpoint)),
        _ => Arc::new(BootstrapAuthProvider::new(config.auth.operators.clone())),
    };

    // Build application
    let app = app::create_app(config.clone(), store, auth);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
