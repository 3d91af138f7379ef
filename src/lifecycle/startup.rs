//! Startup orchestration.
//!
//! Order: metrics exporter, gateway client, listener, then traffic. A
//! listener is only bound once everything it depends on exists.

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::ledger::LedgerError;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create gateway client: {0}")]
    Gateway(#[from] LedgerError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve the API until SIGINT/SIGTERM.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        gateway = %config.gateway.url,
        chain_id = %config.gateway.chain_id,
        finality = ?config.finality.strategy,
        finality_budget_secs = config.finality.budget_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_signal());

    server.run(listener, server_shutdown).await?;
    Ok(())
}
