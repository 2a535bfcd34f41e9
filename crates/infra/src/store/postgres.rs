//! Postgres-backed forecast and metrics stores.
//!
//! One row per (shelter_id, item_id) holding the latest value as JSON:
//!
//! ```sql
//! CREATE TABLE "shelterflow-forecasts" (
//!     shelter_id   TEXT        NOT NULL,
//!     item_id      TEXT        NOT NULL,
//!     forecast     JSONB       NOT NULL,
//!     generated_at TIMESTAMPTZ NOT NULL,
//!     PRIMARY KEY (shelter_id, item_id)
//! );
//!
//! CREATE TABLE "shelterflow-metrics" (
//!     shelter_id TEXT  NOT NULL,
//!     item_id    TEXT  NOT NULL,
//!     metrics    JSONB NOT NULL,
//!     PRIMARY KEY (shelter_id, item_id)
//! );
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use shelterflow_core::PairKey;
use shelterflow_forecasting::Forecast;

use super::ForecastStore;
use crate::error::{PortError, PortResult};
use crate::metrics::MetricsStore;

pub struct PostgresForecastStore {
    pool: PgPool,
    table: String,
}

impl PostgresForecastStore {
    /// Create a store over `table`.
    ///
    /// The table name is interpolated as a quoted identifier, so it is
    /// restricted to ASCII letters, digits, `_` and `-`.
    pub fn new(pool: PgPool, table: impl Into<String>) -> PortResult<Self> {
        let table = checked_table("forecasts", table.into())?;
        Ok(Self { pool, table })
    }
}

/// Read-only view over the metrics table written by reporting jobs.
pub struct PostgresMetricsStore {
    pool: PgPool,
    table: String,
}

impl PostgresMetricsStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> PortResult<Self> {
        let table = checked_table("metrics", table.into())?;
        Ok(Self { pool, table })
    }
}

fn checked_table(kind: &str, table: String) -> PortResult<String> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(PortError::Misconfigured(format!("invalid {kind} table name: {table:?}")));
    }
    Ok(table)
}

#[async_trait]
impl ForecastStore for PostgresForecastStore {
    #[instrument(skip(self), fields(table = %self.table, pair = %pair), err)]
    async fn latest(&self, pair: &PairKey) -> PortResult<Option<Forecast>> {
        let sql = format!(
            r#"SELECT forecast FROM "{}" WHERE shelter_id = $1 AND item_id = $2"#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(pair.location_id.as_str())
            .bind(pair.item_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_forecast", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: serde_json::Value = row
            .try_get("forecast")
            .map_err(|e| PortError::malformed(format!("forecast column: {e}")))?;

        serde_json::from_value(payload)
            .map(Some)
            .map_err(|e| PortError::malformed(format!("forecast payload: {e}")))
    }

    #[instrument(skip(self, forecast), fields(table = %self.table, pair = %forecast.pair()), err)]
    async fn put(&self, forecast: &Forecast) -> PortResult<()> {
        let payload = serde_json::to_value(forecast)
            .map_err(|e| PortError::malformed(format!("serialize forecast: {e}")))?;

        let sql = format!(
            r#"
            INSERT INTO "{}" (shelter_id, item_id, forecast, generated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (shelter_id, item_id)
            DO UPDATE SET forecast = EXCLUDED.forecast, generated_at = EXCLUDED.generated_at
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(forecast.location_id().as_str())
            .bind(forecast.item_id().as_str())
            .bind(payload)
            .bind(forecast.generated_at())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("put_forecast", e))?;

        Ok(())
    }
}

#[async_trait]
impl MetricsStore for PostgresMetricsStore {
    #[instrument(skip(self), fields(table = %self.table, pair = %pair), err)]
    async fn get(&self, pair: &PairKey) -> PortResult<Option<serde_json::Value>> {
        let sql = format!(
            r#"SELECT metrics FROM "{}" WHERE shelter_id = $1 AND item_id = $2"#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(pair.location_id.as_str())
            .bind(pair.item_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_metrics", e))?;

        row.map(|r| r.try_get::<serde_json::Value, _>("metrics"))
            .transpose()
            .map_err(|e| map_sqlx_error("get_metrics", e))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> PortError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            PortError::malformed(format!("{operation}: {err}"))
        }
        other => PortError::unavailable(format!("{operation}: {other}")),
    }
}
