use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use saas_config::Settings;
use saas_permissions::logging::init_tracing;
use saas_permissions::router::init_router;
use saas_permissions::state::init_app_state;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("failed to initialize logging")?;

    let settings = Settings::load().context("failed to load configuration")?;
    let addr = settings.server.addr();
    let development = settings.environment.is_development();
    info!(
        environment = settings.environment.as_str(),
        https_redirect = settings.https.redirect,
        "Starting permissions service"
    );

    let state = init_app_state(settings).await?;
    let app = init_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server listening");
    if development {
        info!("Swagger UI available at http://{addr}/swagger-ui");
        info!("Scalar UI available at http://{addr}/scalar");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
