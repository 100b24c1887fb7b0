use std::sync::Arc;

use log::{error, info};
use profile_persistence_mongodb::{
    ConfigError, ConnectError, MongoConfig, MongoConnection, profile::ProfileRepositoryImpl,
};
use profile_server_api::{HttpConfig, HttpConfigError};
use profile_server_app::build_application;

mod logs;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    HttpConfig(#[from] HttpConfigError),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error("HTTP server failed: {0}")]
    Serve(#[from] std::io::Error),
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received. Preparing graceful exit...");
}

async fn run() -> Result<(), StartupError> {
    let mongo_config = MongoConfig::from_env()?;
    let http_config = HttpConfig::from_env()?;

    let connection = MongoConnection::open(&mongo_config).await?;

    let profile_repo = Arc::new(ProfileRepositoryImpl::new(&connection));
    let app = Arc::new(build_application(profile_repo));

    info!("Starting application");
    let served = profile_server_api::run(app, &http_config, shutdown_signal()).await;

    connection.close().await;
    info!("Database connection closed");

    Ok(served?)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = logs::init_logger() {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}
