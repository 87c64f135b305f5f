use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ziplens::routes::build_router;
use ziplens::state::AppState;
use ziplens::{Config, ProfileBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing census key only degrades lookups.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "ziplens={level},ziplens_api={level},tower_http=info",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ziplens API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Nonprofit dataset: {} (lookup timeout {}s)",
        config.bmf_path.display(),
        config.lookup_timeout.as_secs()
    );

    let builder =
        ProfileBuilder::from_config(&config).context("Failed to initialize data sources")?;

    let state = AppState { builder };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
