mod api;
mod problem;
mod router;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};

use complaint_desk_core::ComplaintStore;
use complaint_desk_util::{load_env_file, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let store = if config.seed_complaints {
        ComplaintStore::new()
    } else {
        ComplaintStore::empty()
    };
    info!(stage = "app", complaints = store.len(), "complaint store ready");

    let state = router::AppState::new(metrics, Arc::new(store), config.cors_origins.clone());

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
