//! ertdrive Agent
//!
//! Thin HTTP shell: loads configuration, starts the drive watcher and serves
//! the wallet query. Device detection and wallet discovery live in `crates/`.

mod error;
pub mod routes;
pub mod state;

pub use routes::{router, WalletResponse};
pub use state::AppState;

use ertdrive_core::{AppConfig, ErtdriveError, Result};
use ertdrive_device::DeviceLocator;
use ertdrive_discovery::{ScanOptions, WalletScanner};
use ertdrive_watch::DriveWatcher;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ertdrive=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Serve until Ctrl-C / SIGTERM, then stop the watcher.
pub async fn run(config: AppConfig) -> Result<()> {
    info!("Starting ertdrive agent v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(
        DeviceLocator::system(),
        WalletScanner::new(ScanOptions::from(&config.scan)),
    );

    let cancel = CancellationToken::new();
    let watcher = if config.watch.enabled {
        let watcher = DriveWatcher::new(state.locator.clone(), state.scanner.clone())
            .with_interval(config.watch.interval());
        Some(watcher.spawn(cancel.clone()))
    } else {
        info!("Drive watcher disabled");
        None
    };

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Some(handle) = watcher {
        handle
            .await
            .map_err(|e| ErtdriveError::Internal(format!("drive watcher failed: {e}")))?;
    }

    info!("ertdrive agent stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
