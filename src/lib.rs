#[macro_use]
extern crate log;

pub mod auth;
pub mod catalog;
pub mod config;
pub mod cookie;
pub mod database;
pub mod entity;
pub mod error;
pub mod flash;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod review;
pub mod sentiment;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_support;

use tokio::{net::TcpListener, signal};

pub use config::Config;
pub use state::AppState;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    use anyhow::Context;

    let listen_addr = config.listen_addr;
    let state = AppState::new(config).await?;
    let app = handlers::router(state);

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    info!("listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                error!("failed to install signal handler: {}", err);
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
