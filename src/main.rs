//! Proposal Dispatch server binary.

use anyhow::Context;
use proposal_dispatch::api::rest::{AppState, create_router_with_origins};
use proposal_dispatch::application::services::ProposalService;
use proposal_dispatch::infrastructure::rendering::PdfRenderer;
use proposal_dispatch::settings::AppConfig;
use proposal_dispatch::telemetry;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.logging)?;

    config.validate().context("invalid configuration")?;
    let providers = config.build_providers()?;
    let catalog = config.catalog()?;
    info!(
        providers = ?config.delivery.order,
        packages = catalog.len(),
        timeout_ms = config.delivery.timeout_ms,
        "Configuration loaded"
    );

    let service = ProposalService::try_new(
        Arc::new(catalog),
        Arc::new(PdfRenderer::new(config.render_options())),
        providers,
    )?;
    let router = create_router_with_origins(
        AppState::new(Arc::new(service)),
        &config.server.cors_origins,
    );

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "Proposal Dispatch listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Could not install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
