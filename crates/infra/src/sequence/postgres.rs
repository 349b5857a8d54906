//! Postgres-backed sequence source.
//!
//! The counter is a database `SEQUENCE` object (see `sql/schema.sql`):
//!
//! ```sql
//! CREATE SEQUENCE product_id_sequence
//!     START WITH 1 INCREMENT BY 1 MINVALUE 1 MAXVALUE 99999 CYCLE;
//! ```
//!
//! `nextval` is atomic across every connection and every node sharing the
//! database, and is never rolled back, which is exactly the contract of
//! [`SequenceSource`]: no value is issued twice within a cycle, and values consumed
//! by a failed request stay consumed.
//!
//! ## Error Mapping
//!
//! Every `sqlx::Error` becomes [`SequenceError::SourceUnavailable`]. A value
//! outside the five-digit range means the sequence object was altered; it is
//! reported the same way rather than truncated into a colliding identifier.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, Span};

use catalog_core::SequenceValue;

use super::r#trait::{SEQUENCE_MIN, SequenceError, SequenceSource};

/// Name of the database sequence backing product identifiers.
pub const PRODUCT_ID_SEQUENCE: &str = "product_id_sequence";

#[derive(Debug, Clone)]
pub struct PostgresSequenceSource {
    pool: Arc<PgPool>,
}

impl PostgresSequenceSource {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl SequenceSource for PostgresSequenceSource {
    #[instrument(skip(self), fields(operation = "nextval", value = tracing::field::Empty), err)]
    async fn next(&self) -> Result<SequenceValue, SequenceError> {
        let raw: i64 = sqlx::query_scalar("SELECT nextval($1::regclass)")
            .bind(PRODUCT_ID_SEQUENCE)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("nextval", e))?;

        Span::current().record("value", raw);

        if raw == i64::from(SEQUENCE_MIN) {
            self.report_minimum().await;
        }

        SequenceValue::try_from(raw).map_err(|e| {
            SequenceError::SourceUnavailable(format!(
                "{PRODUCT_ID_SEQUENCE} returned an out-of-range value: {e}"
            ))
        })
    }
}

impl PostgresSequenceSource {
    /// `nextval` cannot tell a fresh sequence from one that just cycled. Every
    /// stored product consumed a value, so a non-empty table means a wraparound.
    async fn report_minimum(&self) {
        let products_exist = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM products)")
            .fetch_one(&*self.pool)
            .await;

        match products_exist.map(minimum_kind) {
            Ok(MinimumKind::Wraparound) => tracing::warn!(
                sequence = PRODUCT_ID_SEQUENCE,
                "product id sequence wrapped around"
            ),
            Ok(MinimumKind::FirstAllocation) => tracing::info!(
                sequence = PRODUCT_ID_SEQUENCE,
                "product id sequence issued its first value"
            ),
            Err(e) => tracing::info!(
                sequence = PRODUCT_ID_SEQUENCE,
                error = %e,
                "product id sequence at its minimum value"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinimumKind {
    FirstAllocation,
    Wraparound,
}

fn minimum_kind(products_exist: bool) -> MinimumKind {
    if products_exist {
        MinimumKind::Wraparound
    } else {
        MinimumKind::FirstAllocation
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> SequenceError {
    match err {
        sqlx::Error::Database(db_err) => SequenceError::SourceUnavailable(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            SequenceError::SourceUnavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            SequenceError::SourceUnavailable(format!("connection pool timed out in {}", operation))
        }
        _ => SequenceError::SourceUnavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_on_empty_catalog_is_first_allocation() {
        assert_eq!(minimum_kind(false), MinimumKind::FirstAllocation);
    }

    #[test]
    fn minimum_with_stored_products_is_wraparound() {
        assert_eq!(minimum_kind(true), MinimumKind::Wraparound);
    }

    #[test]
    fn every_sqlx_error_is_source_unavailable() {
        let err = map_sqlx_error("nextval", sqlx::Error::PoolTimedOut);
        assert_eq!(
            err,
            SequenceError::SourceUnavailable("connection pool timed out in nextval".to_string())
        );
        assert!(matches!(
            map_sqlx_error("nextval", sqlx::Error::RowNotFound),
            SequenceError::SourceUnavailable(_)
        ));
    }
}
