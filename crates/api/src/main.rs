//! Castbridge - Farcaster to Twitter cast bridge
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use castbridge_api::utils::logging::init_tracing;
use castbridge_api::{build_router, AppContext};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so RUST_LOG from the file takes effect
    let dotenv = dotenvy::dotenv();
    init_tracing()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env file loaded"),
    }

    let config = castbridge_infra::config::load().context("failed to load configuration")?;
    if config.webhook.secret.is_none() {
        warn!("NEYNAR_WEBHOOK_SECRET is not set; every webhook will be rejected");
    }

    let bind_addr = config.server.bind_addr.clone();
    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "castbridge listening");

    axum::serve(listener, build_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("castbridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
