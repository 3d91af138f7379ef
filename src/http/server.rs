//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all API handlers
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Own the shared application state
//! - Serve until the shutdown signal fires

use arc_swap::ArcSwapOption;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers;
use crate::http::request::MakeRequestUuid;
use crate::http::response::ApiError;
use crate::ledger::{Gateway, GatewayClient, LedgerResult};
use crate::orchestrator::{finality, SessionConfig, SubmissionOrchestrator};
use crate::query::ScoreQuery;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator>,
    /// Empty until `/set_config` succeeds.
    pub session: Arc<ArcSwapOption<SessionConfig>>,
    pub score_query: Arc<ScoreQuery>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Snapshot of the current session.
    pub fn session(&self) -> Result<Arc<SessionConfig>, ApiError> {
        self.session.load_full().ok_or(ApiError::NotConfigured)
    }
}

/// HTTP server for the quiz relay API.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a server talking to the gateway named in `config`.
    pub fn new(config: RelayConfig) -> LedgerResult<Self> {
        let gateway = Arc::new(GatewayClient::new(&config.gateway)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create a server over an arbitrary gateway implementation.
    pub fn with_gateway(config: RelayConfig, gateway: Arc<dyn Gateway>) -> Self {
        let orchestrator = SubmissionOrchestrator::new(
            gateway,
            finality::from_config(&config.finality),
            &config.gateway,
        );
        let config = Arc::new(config);

        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(ArcSwapOption::empty()),
            score_query: Arc::new(ScoreQuery::new(&config.query, &config.gateway)),
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/set_config", post(handlers::set_config))
            .route(
                "/generate_and_get_operations",
                post(handlers::generate_and_get_operations),
            )
            .route("/get_operations", get(handlers::get_operations))
            .route("/submit_test", post(handlers::submit_test))
            .route("/get_correct_answers", get(handlers::get_correct_answers))
            .route("/get_test_results", post(handlers::get_test_results))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            gateway = %self.config.gateway.url,
            finality = ?self.config.finality.strategy,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
