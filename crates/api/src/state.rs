use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: boxlab_db::DbPool,
    /// Server configuration (upload root, cleanup delay, bind options).
    pub config: Arc<ServerConfig>,
}
