use std::net::SocketAddr;

use dotenvy::dotenv;
use recruitment_portal::{AppState, config::Config, serve};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.port;

    info!("Initializing state...");
    let state = AppState::from_config(config).await?;

    // server address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    serve(listener, state).await?;

    info!("Server stopped");
    Ok(())
}
