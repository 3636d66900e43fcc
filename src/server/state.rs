//! Application state management

use crate::inference::InferenceEngine;
use chrono::{DateTime, Utc};

use super::ServerConfig;

/// Application state shared across handlers.
///
/// Nothing in here changes after startup, so handlers read it without locks.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub engine: InferenceEngine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: InferenceEngine) -> Self {
        Self {
            config,
            engine,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
