//! Repository for the `power_samples` table (append-only time-series).

use sqlx::PgPool;

use crate::models::power_sample::{CreatePowerSample, PowerSample};

/// Column list for `power_samples` SELECT queries.
const COLUMNS: &str = "id, recorded_at, dk1, dk2, dk_gas";

/// Column list for `power_samples` INSERT statements (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "recorded_at, dk1, dk2, dk_gas";

/// Bind parameters per inserted row.
const PARAMS_PER_ROW: usize = 4;

/// Rows per INSERT statement, kept well under PostgreSQL's 65535 bind limit.
const BATCH_ROWS: usize = 1000;

/// Provides query operations for power samples.
pub struct PowerSampleRepo;

impl PowerSampleRepo {
    /// Every sample, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PowerSample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM power_samples ORDER BY recorded_at ASC, id ASC");
        sqlx::query_as::<_, PowerSample>(&query)
            .fetch_all(pool)
            .await
    }

    /// Append samples using multi-row INSERTs inside a single transaction.
    ///
    /// Returns the number of rows written.
    pub async fn insert_batch(
        pool: &PgPool,
        samples: &[CreatePowerSample],
    ) -> Result<u64, sqlx::Error> {
        if samples.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for chunk in samples.chunks(BATCH_ROWS) {
            let query = build_insert(chunk.len());
            let mut q = sqlx::query(&query);
            for s in chunk {
                q = q.bind(s.timestamp).bind(s.dk1).bind(s.dk2).bind(s.dk_gas);
            }
            inserted += q.execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(inserted, "Power samples appended");
        Ok(inserted)
    }
}

/// Build `INSERT ... VALUES ($1, $2, $3, $4), ($5, ...)` for `rows` rows.
fn build_insert(rows: usize) -> String {
    let mut query = format!("INSERT INTO power_samples ({INSERT_COLUMNS}) VALUES ");
    let mut param_idx = 1;
    for row in 0..rows {
        if row > 0 {
            query.push_str(", ");
        }
        query.push('(');
        for col in 0..PARAMS_PER_ROW {
            if col > 0 {
                query.push_str(", ");
            }
            query.push('$');
            query.push_str(&param_idx.to_string());
            param_idx += 1;
        }
        query.push(')');
    }
    query
}
