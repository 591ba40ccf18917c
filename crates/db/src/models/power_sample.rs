//! Power-cost time series models.
//!
//! Each sample carries three price signals: the two Danish electricity
//! price areas (`dk1`, `dk2`) and the gas price (`dk_gas`).

use gridwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `power_samples` table (append-only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PowerSample {
    pub id: DbId,
    #[sqlx(rename = "recorded_at")]
    pub timestamp: Timestamp,
    pub dk1: f64,
    pub dk2: f64,
    pub dk_gas: f64,
}

/// DTO for appending a sample.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePowerSample {
    pub timestamp: Timestamp,
    pub dk1: f64,
    pub dk2: f64,
    pub dk_gas: f64,
}
