pub mod alerts;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /alerts                 list, create (auth required)
/// /alerts/power-data      power-cost time series (auth required)
/// /alerts/{id}            update, delete (owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/alerts", alerts::router())
}
