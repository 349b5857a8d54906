//! Postgres-backed product store.
//!
//! Maps to the `products` table created by `sql/schema.sql`. Two unique indexes
//! back the uniqueness rules of [`ProductStore`]:
//!
//! - `ix_products_product_id` on `product_id` (every row, active or not)
//! - `ix_products_active_name` on `name WHERE is_active`
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation on `ix_products_active_name`) | `23505` | `DuplicateName` |
//! | Database (unique violation on `ix_products_product_id`) | `23505` | `IdentifierTaken` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Unavailable` |
//! | Row decoding failures | N/A | `Corrupt` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{instrument, Span};

use catalog_core::ProductIdentifier;
use catalog_products::{AuditFields, Product};

use super::r#trait::{ProductStore, StoreError};

const ACTIVE_NAME_INDEX: &str = "ix_products_active_name";
const PRODUCT_ID_INDEX: &str = "ix_products_product_id";

const PRODUCT_COLUMNS: &str = r#"
    product_id,
    name,
    description,
    unit_price,
    stock,
    created_at,
    last_modified_at,
    is_active
"#;

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync). Every
/// write is a single statement, so it is atomic without an explicit transaction.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), fields(operation = "find_product_by_name"), err)]
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1 AND is_active"
        ))
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e, None))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(operation = "find_product_by_id", product_id = %id), err)]
    async fn find_active_by_id(
        &self,
        id: &ProductIdentifier,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND is_active"
        ))
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_id", e, None))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(operation = "list_products", product_count = tracing::field::Empty), err)]
    async fn list_active(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active ORDER BY product_id ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e, None))?;

        Span::current().record("product_count", rows.len());
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, product), fields(operation = "insert_product", product_id = %product.product_id), err)]
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (product_id, name, description, unit_price, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.product_id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.stock)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e, Some(&product)))?;

        product_from_row(&row)
    }

    #[instrument(skip(self, product), fields(operation = "update_product", product_id = %product.product_id), err)]
    async fn update(&self, product: Product) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                unit_price = $4,
                stock = $5,
                last_modified_at = NOW()
            WHERE product_id = $1 AND is_active
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.product_id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.stock)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e, Some(&product)))?;

        match row {
            Some(row) => product_from_row(&row),
            None => Err(StoreError::Missing(product.product_id)),
        }
    }

    #[instrument(skip(self), fields(operation = "delete_product", product_id = %id), err)]
    async fn delete(&self, id: &ProductIdentifier) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET is_active = FALSE,
                last_modified_at = NOW()
            WHERE product_id = $1 AND is_active
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_product", e, None))?;

        match row {
            Some(row) => product_from_row(&row),
            None => Err(StoreError::Missing(id.clone())),
        }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::Corrupt(e.to_string());

    let raw_id: String = row.try_get("product_id").map_err(corrupt)?;
    let product_id = catalog_core::normalize(&raw_id)
        .map_err(|e| StoreError::Corrupt(format!("product_id {raw_id:?}: {e}")))?;

    Ok(Product {
        product_id,
        name: row.try_get("name").map_err(corrupt)?,
        description: row.try_get("description").map_err(corrupt)?,
        unit_price: row.try_get::<Decimal, _>("unit_price").map_err(corrupt)?,
        stock: row.try_get::<i64, _>("stock").map_err(corrupt)?,
        audit: AuditFields {
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(corrupt)?,
            last_modified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_modified_at")
                .map_err(corrupt)?,
            is_active: row.try_get("is_active").map_err(corrupt)?,
        },
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error, product: Option<&Product>) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            let unique_violation = db_err.code().as_deref() == Some("23505");
            match (unique_violation, db_err.constraint(), product) {
                (true, Some(ACTIVE_NAME_INDEX), Some(p)) => StoreError::DuplicateName(p.name.clone()),
                (true, Some(PRODUCT_ID_INDEX), Some(p)) => {
                    StoreError::IdentifierTaken(p.product_id.clone())
                }
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
