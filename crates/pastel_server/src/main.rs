//! Pastel server entrypoint.

use pastel_server::{resolve_bind_address, serve_router, AppState, Config, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();

    let default_filter = if config.debug {
        "pastel=debug,tower_http=info"
    } else {
        "pastel=info,tower_http=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = Database::new(&config.db_path)?;
    tracing::info!("Database ready at {}", config.db_path);

    let addr = resolve_bind_address(&config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    let state = AppState::new(config, database);
    serve_router(listener, state, shutdown_signal()).await?;
    Ok(())
}
