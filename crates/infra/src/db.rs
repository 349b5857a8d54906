//! Database wiring: connection pool and schema bootstrap.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

/// Schema for the product table and the identifier sequence.
///
/// Every statement is idempotent (`IF NOT EXISTS`), so every node runs it at
/// startup.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Open a Postgres connection pool.
#[instrument(skip(database_url), err)]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Create the sequence, table and indexes if they are missing.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    tracing::info!("product schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_cyclic_five_digit_sequence() {
        assert!(SCHEMA_SQL.contains("CREATE SEQUENCE IF NOT EXISTS product_id_sequence"));
        assert!(SCHEMA_SQL.contains("MINVALUE 1"));
        assert!(SCHEMA_SQL.contains("MAXVALUE 99999"));
        assert!(SCHEMA_SQL.contains("CYCLE"));
    }

    #[test]
    fn schema_declares_unique_indexes_used_for_error_mapping() {
        assert!(SCHEMA_SQL.contains("ix_products_product_id"));
        assert!(SCHEMA_SQL.contains("ix_products_active_name"));
        assert!(SCHEMA_SQL.contains("WHERE is_active"));
    }
}
