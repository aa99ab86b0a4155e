//! Service entry point for the shift accounting engine.
//!
//! Loads the configuration, wires the shift repository into the engine,
//! spawns the reconciliation scheduler (with its startup catch-up), and
//! serves the reporting API.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shift_engine::api::{AppState, create_router};
use shift_engine::config::ConfigLoader;
use shift_engine::reconciliation::run_reconciliation_loop;
use shift_engine::repository::InMemoryShiftRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("SHIFT_ENGINE_CONFIG").unwrap_or_else(|_| "./config/engine".to_string());
    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        time_zone = %config.schedule().time_zone,
        reconcile_at = %config.schedule().reconcile_at,
        "Configuration loaded"
    );

    let repository = Arc::new(InMemoryShiftRepository::new());
    let state = AppState::new(config, repository);

    // The scheduler performs the two-day startup catch-up before entering
    // its daily loop; both call the same idempotent reconcile operation the
    // /reconcile endpoint uses.
    let scheduler_repo = state.repository_handle();
    let scheduler_config = Arc::new(state.config().config().clone());
    tokio::spawn(run_reconciliation_loop(scheduler_repo, scheduler_config));

    let bind_addr =
        std::env::var("SHIFT_ENGINE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Serving shift engine API");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
