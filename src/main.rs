use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use reply_desk::{Config, ReplyDeskService, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Loaded once; immutable for the lifetime of the process
    let config = Config::load();

    let service = ReplyDeskService::from_config(&config)?;
    let router = build_router(service);

    let bind = config.bind_addr().with_context(|| {
        format!(
            "Invalid bind address {}:{}",
            config.server.host, config.server.port
        )
    })?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        page_id = %config.graph.page_id,
        timeout_secs = config.upstream.timeout_seconds,
        "Backend running"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
