//! Handlers for the `/alerts` resource.
//!
//! Every endpoint requires authentication via [`AuthUser`]; the caller's user
//! id is the owner scope for listing and the ownership check for writes.
//! Create and update take the full field set ([`AlertFields`]) and validate
//! it before touching the database.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gridwatch_core::alert::AlertFields;
use gridwatch_core::error::CoreError;
use gridwatch_core::types::DbId;
use gridwatch_db::models::alert::Alert;
use gridwatch_db::repositories::AlertRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Entity name used in not-found and forbidden messages.
const ENTITY: &str = "Alert";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch an alert by ID and verify the caller owns it.
///
/// Returns `NotFound` if the alert does not exist, `Forbidden` if it belongs
/// to someone else. `action` is used in the error message.
async fn find_and_authorize(
    pool: &sqlx::PgPool,
    alert_id: DbId,
    auth: &AuthUser,
    action: &str,
) -> AppResult<Alert> {
    let alert = AlertRepo::find_by_id(pool, alert_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ENTITY,
            id: alert_id,
        }))?;

    if alert.owner_id != auth.user_id {
        tracing::warn!(alert_id, user_id = auth.user_id, action, "Alert access denied");
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Cannot {action} another user's alert"
        ))));
    }

    Ok(alert)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/alerts
///
/// List the caller's alerts, newest first.
pub async fn list_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let alerts = AlertRepo::list_for_owner(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/alerts
///
/// Create an alert owned by the caller. Returns 201 with the stored alert.
pub async fn create_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<AlertFields>,
) -> AppResult<impl IntoResponse> {
    let def = input.validate()?;
    let alert = AlertRepo::create(&state.pool, auth.user_id, &def).await?;

    tracing::info!(
        alert_id = alert.id,
        user_id = auth.user_id,
        name = %alert.name,
        criteria = %alert.criteria,
        "Alert created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: alert })))
}

/// PUT /api/v1/alerts/{id}
///
/// Replace every mutable field of one of the caller's alerts. Existence and
/// ownership are checked before the body is validated; the write itself
/// re-checks both under a row lock.
pub async fn update_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(alert_id): ValidPath<DbId>,
    ValidJson(input): ValidJson<AlertFields>,
) -> AppResult<impl IntoResponse> {
    find_and_authorize(&state.pool, alert_id, &auth, "update").await?;

    let def = input.validate()?;
    let alert = AlertRepo::update_owned(&state.pool, auth.user_id, alert_id, &def)
        .await?
        .into_core(ENTITY, alert_id)?;

    tracing::info!(alert_id, user_id = auth.user_id, "Alert updated");

    Ok(Json(DataResponse { data: alert }))
}

/// DELETE /api/v1/alerts/{id}
///
/// Delete one of the caller's alerts.
pub async fn delete_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidPath(alert_id): ValidPath<DbId>,
) -> AppResult<impl IntoResponse> {
    AlertRepo::delete_owned(&state.pool, auth.user_id, alert_id)
        .await?
        .into_core(ENTITY, alert_id)?;

    tracing::info!(alert_id, user_id = auth.user_id, "Alert deleted");

    Ok(Json(MessageResponse {
        message: "Alert removed",
    }))
}
