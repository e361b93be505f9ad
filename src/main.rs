mod config;
mod db;
mod error;
mod handlers;
mod models;
mod voting;

use config::Config;
use db::Database;
use handlers::{AppState, build_router};
use log::{error, info};
use models::Catalog;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), error::BoxError> {
    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.candidates_path)?;
    info!(
        "Loaded {} positions from {}",
        catalog.len(),
        config.candidates_path.display()
    );

    let database = Database::new(&config.database_url, config.max_connections).await?;

    let state = AppState {
        database: Arc::new(database),
        catalog: Arc::new(catalog),
    };
    let app = build_router(state, &config.allowed_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Election Poll API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
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
