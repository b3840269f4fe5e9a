use std::{future::Future, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::{CustomerService, CustomerStore, InMemoryCustomerStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Create the process-scoped store, wire the service to it and apply seed data.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let store: Arc<dyn CustomerStore> = Arc::new(InMemoryCustomerStore::new());
    let customers = CustomerService::new(store).with_id_assignment(cfg.store.id_assignment);
    customers.seed(&cfg.store.seed).await?;
    info!(id_assignment = ?cfg.store.id_assignment, seeded = cfg.store.seed.len(), "customer store ready");
    Ok(ServerState::new(customers))
}

pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: bind the configured address and serve until Ctrl+C
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg
        .server
        .bind_addr()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))?;
    let app = build_app(&cfg).await?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "customer api listening");
    serve(listener, app, shutdown_signal()).await
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; serving until the process is killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}
