use std::sync::Arc;

use crate::config::ServerConfig;
use crate::launcher::EstimatorLauncher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: estimator_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fire-and-forget launcher for the external estimator script.
    pub launcher: Arc<EstimatorLauncher>,
}
