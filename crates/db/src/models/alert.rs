//! Threshold alert entity.
//!
//! The `criteria` and `active_days` columns are stored as text tokens and
//! decoded into their domain types when the row is read; a token outside the
//! known set surfaces as a column decode error.

use gridwatch_core::alert::Criteria;
use gridwatch_core::types::{DbId, Timestamp};
use gridwatch_core::weekday::WeekdaySet;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub criteria: Criteria,
    pub value: f64,
    #[sqlx(try_from = "Vec<String>")]
    pub active_days: WeekdaySet,
    pub notify_email: String,
    pub notify_phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
