//! Agenda gateway - request forwarding and page-data loading for the booking UI
//!
//! Relays client, service and appointment requests to the booking backend,
//! aggregates page data with per-resource fallbacks, and keeps the transient
//! UI notification queue.

pub mod backend;
pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod notifications;
pub mod proxy;
pub mod server;

pub use config::{load_config, Config};
pub use error::{GatewayError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::io::ReqwestHttpClient;
use crate::notifications::NotificationStore;
use crate::server::AppState;

/// Build the shared application state for the given configuration
pub fn build_state(config: &Config) -> AppState {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let backend = BackendClient::new(config.backend.base_url.clone(), http);
    let notifications = NotificationStore::new(config.notifications.default_ttl);
    AppState::new(backend, notifications)
}

/// Run the gateway until the cancellation token fires
pub async fn serve(config: Config, cancel: CancellationToken) -> Result<()> {
    let state = build_state(&config);
    let notifications = state.notifications.clone();
    let backend_url = state.backend.base_url().to_string();
    let router = server::build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        GatewayError::Server(format!("Failed to bind {}: {}", addr, e))
    })?;
    tracing::info!(
        "Gateway listening on http://{}, forwarding to {}",
        listener.local_addr()?,
        backend_url
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    notifications.shutdown();
    tracing::info!("Gateway stopped");
    Ok(())
}

/// Run the gateway until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    serve(config, cancel).await
}
