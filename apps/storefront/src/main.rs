//! # Vitrine Storefront
//!
//! Binary entry point: load config, build state, serve until Ctrl+C or
//! SIGTERM.

use tokio::net::TcpListener;
use tracing::{info, warn};
use vitrine_storefront::{init_tracing, router, AppState, StorefrontConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Vitrine storefront...");

    let config = StorefrontConfig::load()?;
    info!(
        addr = %config.addr(),
        dev_mode = config.dev_mode,
        tax_rate_bps = config.tax_rate_bps,
        session_ttl_secs = config.session_ttl_secs,
        "Configuration loaded"
    );

    let addr = config.addr();
    let state = AppState::new(config);
    let sweeper = state.spawn_session_sweeper();
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
