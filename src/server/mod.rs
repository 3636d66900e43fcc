//! Prediction web server
//!
//! Serves the input form, turns form submissions into price estimates and
//! exposes a health endpoint. The model is loaded once at startup.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use crate::inference::{InferenceEngine, InferencePolicy};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration, built by the `serve` command from its flags and
/// their `API_HOST`, `API_PORT`, `MODEL_PATH` and `INFERENCE_POLICY` env vars
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub policy: InferencePolicy,
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let engine = InferenceEngine::from_path(&config.model_path, config.policy)?;
    info!(
        model_path = %config.model_path.display(),
        n_trees = engine.model().n_trees(),
        policy = %config.policy,
        "Model loaded"
    );

    let state = Arc::new(AppState::new(config.clone(), engine));
    let start_time = state.started_at;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "Server listening"
    );
    info!(url = %format!("http://{}", addr), "Prediction form available");

    // Graceful shutdown on ctrl+c
    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
