use anyhow::Context;

use filmapi_api::app;
use filmapi_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    filmapi_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = app::build_services(&config).await?;
    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!(addr = %listener.local_addr()?, "film-api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
