use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gridwatch_db::DbPool,
    /// Server configuration (read by the auth extractor and middleware).
    pub config: Arc<ServerConfig>,
}
