//! HIMA K3 open recruitment portal.
//!
//! The crate carries both sides of the portal:
//!
//! - an axum backend serving the department catalog, application submission,
//!   status lookup and the JWT-protected admin dashboard API;
//! - [`portal`], a typed client with the session objects used by the
//!   submission form, the status checker and the admin dashboard.

pub mod config;
pub mod error;
pub mod exports;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod portal;
pub mod repositories;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod storage;
pub mod utils;

use tokio::{net::TcpListener, signal};
use tracing::info;

pub use routes::app;
pub use state::AppState;

/// Serve the portal on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
