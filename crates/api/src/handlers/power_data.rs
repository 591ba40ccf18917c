//! Handler for the power-cost time series shown next to the alert list.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use gridwatch_db::repositories::PowerSampleRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/alerts/power-data
///
/// Every stored sample, oldest first. Windowing is left to the client.
pub async fn list_power_data(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let samples = PowerSampleRepo::list_all(&state.pool).await?;

    tracing::debug!(count = samples.len(), "Power samples listed");

    Ok(Json(DataResponse { data: samples }))
}
