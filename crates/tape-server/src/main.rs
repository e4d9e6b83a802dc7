use tape_server::{ServerConfig, app_serving};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let gateway = config.gateway();
    let address = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(
        %address,
        static_dir = %config.static_dir.display(),
        generation_enabled = gateway.is_configured(),
        "tape server listening"
    );

    axum::serve(listener, app_serving(gateway, &config.static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
