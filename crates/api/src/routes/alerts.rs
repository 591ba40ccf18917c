//! Route definitions for alerts and the power-data series.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{alerts, power_data};
use crate::state::AppState;

/// Alert routes mounted at `/alerts`.
///
/// ```text
/// GET    /            -> list_alerts
/// POST   /            -> create_alert
/// GET    /power-data  -> list_power_data
/// PUT    /{id}        -> update_alert
/// DELETE /{id}        -> delete_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts).post(alerts::create_alert))
        .route("/power-data", get(power_data::list_power_data))
        .route(
            "/{id}",
            put(alerts::update_alert).delete(alerts::delete_alert),
        )
}
