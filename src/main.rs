//! SiteVal Server: background URL validation worker
//!
//! Main entry point that wires the stores, tasks and scheduler together and
//! runs the worker until shutdown.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use siteval_core::config::AppConfig;
use siteval_core::error::AppError;
use siteval_worker::{Collaborators, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("SITEVAL_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("SITEVAL_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, Some(&env))
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SiteVal v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        "Initializing option store (provider: {})...",
        config.store.provider
    );
    let deps = Collaborators::from_config(&config).await?;

    let runner = Arc::new(WorkerRunner::build(config.worker.clone(), deps).await?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run(shutdown_rx).await })
    };

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(std::time::Duration::from_secs(30), worker_handle).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(AppError::internal(format!("Worker task panicked: {}", e))),
        Err(_) => tracing::warn!("Worker did not stop within 30s"),
    }

    tracing::info!("SiteVal server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
