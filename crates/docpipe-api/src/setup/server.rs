//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;

use docpipe_core::Config;
use docpipe_infra::shutdown_signal;

/// Start the server with graceful shutdown on SIGINT/SIGTERM.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        storage_path = %config.storage_path(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
