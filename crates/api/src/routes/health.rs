//! Liveness probe for load balancers and the dashboard's status badge.
//!
//! Mounted at the root (`/health`), outside `/api/v1`, and never behind auth.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Always 200; a broken database only flips `db_healthy`.
async fn report_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match gridwatch_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable during health check");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report_health))
}
