//! Repository for the `alerts` table.
//!
//! Every read is scoped to an owner. Updates and deletes lock the target row
//! inside a transaction before checking ownership, so concurrent writes to
//! the same alert serialize on the row lock.

use gridwatch_core::alert::AlertDefinition;
use gridwatch_core::error::CoreError;
use gridwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::Alert;

/// Column list for `alerts` queries.
const COLUMNS: &str = "\
    id, owner_id, name, criteria, value, active_days, \
    notify_email, notify_phone, created_at, updated_at";

/// Result of a write that is only allowed for the row's owner.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedWrite<T> {
    /// The write was applied.
    Applied(T),
    /// No row with the requested id exists.
    Missing,
    /// The row exists but belongs to someone else. Nothing was written.
    NotOwner,
}

impl<T> OwnedWrite<T> {
    /// Map `Missing` to [`CoreError::NotFound`] and `NotOwner` to
    /// [`CoreError::Forbidden`].
    pub fn into_core(self, entity: &'static str, id: DbId) -> Result<T, CoreError> {
        match self {
            OwnedWrite::Applied(value) => Ok(value),
            OwnedWrite::Missing => Err(CoreError::NotFound { entity, id }),
            OwnedWrite::NotOwner => Err(CoreError::Forbidden(format!(
                "Not authorized to modify this {}",
                entity.to_lowercase()
            ))),
        }
    }
}

/// Provides data access for threshold alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// List every alert owned by `owner_id`, newest first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find an alert by id regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new alert owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        def: &AlertDefinition,
    ) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts \
                 (owner_id, name, criteria, value, active_days, notify_email, notify_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(owner_id)
            .bind(&def.name)
            .bind(def.criteria.as_str())
            .bind(def.value)
            .bind(def.active_days.tokens())
            .bind(&def.notify_email)
            .bind(&def.notify_phone)
            .fetch_one(pool)
            .await
    }

    /// Replace every mutable field of an alert owned by `owner_id`.
    pub async fn update_owned(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        def: &AlertDefinition,
    ) -> Result<OwnedWrite<Alert>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        match lock_owner(&mut tx, id).await? {
            None => return Ok(OwnedWrite::Missing),
            Some(existing) if existing != owner_id => return Ok(OwnedWrite::NotOwner),
            Some(_) => {}
        }

        let query = format!(
            "UPDATE alerts SET \
                 name = $2, \
                 criteria = $3, \
                 value = $4, \
                 active_days = $5, \
                 notify_email = $6, \
                 notify_phone = $7, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let alert = sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(&def.name)
            .bind(def.criteria.as_str())
            .bind(def.value)
            .bind(def.active_days.tokens())
            .bind(&def.notify_email)
            .bind(&def.notify_phone)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OwnedWrite::Applied(alert))
    }

    /// Delete an alert owned by `owner_id`.
    pub async fn delete_owned(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<OwnedWrite<()>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        match lock_owner(&mut tx, id).await? {
            None => return Ok(OwnedWrite::Missing),
            Some(existing) if existing != owner_id => return Ok(OwnedWrite::NotOwner),
            Some(_) => {}
        }

        sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OwnedWrite::Applied(()))
    }
}

/// Lock the alert row and return its owner, or `None` if it does not exist.
async fn lock_owner(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    sqlx::query_scalar::<_, DbId>("SELECT owner_id FROM alerts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}
