use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::ProductIdentifier;
use catalog_products::Product;

/// Product store operation error.
///
/// `Unavailable` and `Corrupt` are **infrastructure errors**. `DuplicateName` and
/// `Missing` are uniqueness/lookup outcomes detected by the storage engine itself
/// (e.g. a concurrent writer won a race the service-level check could not see).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("product store unavailable: {0}")]
    Unavailable(String),

    #[error("an active product named {0:?} already exists")]
    DuplicateName(String),

    /// The identifier is already stored (active or not). Only reachable after the
    /// sequence wrapped around onto identifiers still in use.
    #[error("product identifier {0} is already taken")]
    IdentifierTaken(ProductIdentifier),

    /// No active row carries the identifier any more.
    #[error("product {0} does not exist")]
    Missing(ProductIdentifier),

    #[error("corrupt product row: {0}")]
    Corrupt(String),
}

/// Narrow, product-specific persistence boundary.
///
/// Only **active** products are visible to lookups and listings. Deletion is soft:
/// the row stays, so its identifier remains reserved forever, while its name is
/// released for reuse.
///
/// Implementations own the audit fields: `insert` stamps `created_at` and marks the
/// row active, `update`/`delete` stamp `last_modified_at`. Whatever audit values the
/// caller passes in are ignored.
///
/// Every write is durable when the call returns (there is no separate commit).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Exact, case-sensitive name match among active products.
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    async fn find_active_by_id(&self, id: &ProductIdentifier)
        -> Result<Option<Product>, StoreError>;

    /// All active products, ordered by identifier.
    async fn list_active(&self) -> Result<Vec<Product>, StoreError>;

    /// Persist a new product. Fails with `DuplicateName` if an active product has
    /// the same name and `IdentifierTaken` if the identifier was ever stored.
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    /// Overwrite the mutable fields of an active product.
    async fn update(&self, product: Product) -> Result<Product, StoreError>;

    /// Soft-delete an active product, returning its final state.
    async fn delete(&self, id: &ProductIdentifier) -> Result<Product, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_active_by_name(name).await
    }

    async fn find_active_by_id(
        &self,
        id: &ProductIdentifier,
    ) -> Result<Option<Product>, StoreError> {
        (**self).find_active_by_id(id).await
    }

    async fn list_active(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_active().await
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn update(&self, product: Product) -> Result<Product, StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: &ProductIdentifier) -> Result<Product, StoreError> {
        (**self).delete(id).await
    }
}
