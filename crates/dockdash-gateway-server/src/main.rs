use color_eyre::eyre;
use dockdash_engine::DockerEngine;
use dockdash_gateway_server::{create_app, AppState, GatewayConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dockdash_gateway_server=debug")),
        )
        .init();

    let config = GatewayConfig::from_env()?;

    // The engine connects on the first request that needs it.
    let engine = Arc::new(DockerEngine::new(config.socket_path.clone()));
    info!(socket = %engine.socket_path(), "Docker engine configured");

    let app = create_app(AppState::new(engine));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("dockdash gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
