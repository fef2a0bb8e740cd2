//! Application state
//!
//! Shared state for API handlers: the chart engine and the backend it reads.

use std::sync::Arc;
use std::time::Instant;

use tally_analytics::ChartEngine;
use tally_query::SalesBackend;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Chart engine
    pub charts: Arc<ChartEngine>,
    /// Sales backend, for health probes
    pub backend: Arc<dyn SalesBackend>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create state over a sales backend
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self {
            charts: Arc::new(ChartEngine::new(Arc::clone(&backend))),
            backend,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
