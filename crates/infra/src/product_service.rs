//! Product application service.
//!
//! `ProductKeyService` is the only place where identifiers are minted. Every
//! operation follows the same shape:
//!
//! ```text
//! raw input
//!   ↓
//! 1. Validate (identifier normalization, field rules)
//!   ↓
//! 2. Locate (active products only)
//!   ↓
//! 3. Mutate (pure domain method on Product)
//!   ↓
//! 4. Persist through the ProductStore
//! ```
//!
//! Creation replaces "locate" with a duplicate-name check followed by allocation of
//! a sequence value from the shared [`SequenceSource`]. The service holds no mutable
//! state of its own; it is cheap to share behind an `Arc`.

use thiserror::Error;
use tracing::{debug, instrument};

use catalog_core::{
    DomainError, NodeIdentity, ProductIdentifier, ValidationError, encode, normalize,
};
use catalog_products::{NewProduct, Product, ProductPatch, StockDirection};

use crate::product_store::{ProductStore, StoreError};
use crate::sequence::{SequenceError, SequenceSource};

/// Failure of a product operation.
///
/// `Domain` failures are deterministic and caused by the request; `Sequence` and
/// `Store` are infrastructure failures and are never masked as domain outcomes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, ServiceError::Sequence(_) | ServiceError::Store(_))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        ServiceError::Domain(value.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateName(_) => ServiceError::Domain(DomainError::DuplicateName),
            StoreError::Missing(id) => ServiceError::Domain(DomainError::not_found(id)),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Product operations for one node.
///
/// ## Generic Parameters
///
/// - `Q`: product store implementation
/// - `S`: sequence source shared by every node of the deployment
#[derive(Debug, Clone)]
pub struct ProductKeyService<Q, S> {
    node: NodeIdentity,
    store: Q,
    sequence: S,
}

impl<Q, S> ProductKeyService<Q, S>
where
    Q: ProductStore,
    S: SequenceSource,
{
    pub fn new(node: NodeIdentity, store: Q, sequence: S) -> Self {
        Self {
            node,
            store,
            sequence,
        }
    }

    pub fn node(&self) -> NodeIdentity {
        self.node
    }

    /// Create a product under a freshly allocated identifier.
    ///
    /// A sequence value consumed here is never returned, even if the insert fails.
    #[instrument(skip(self, input), fields(node_id = %self.node, name = %input.name), err)]
    pub async fn create_product(&self, input: NewProduct) -> ServiceResult<Product> {
        input.validate()?;

        if self.store.find_active_by_name(&input.name).await?.is_some() {
            return Err(DomainError::DuplicateName.into());
        }

        let product_id = self.next_identifier().await?;
        let product = Product::new(product_id, input);
        Ok(self.store.insert(product).await?)
    }

    /// Every active product, ordered by identifier.
    #[instrument(skip(self), err)]
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list_active().await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_product(&self, raw_id: &str) -> ServiceResult<Product> {
        self.locate(raw_id).await
    }

    /// Apply a partial update. Blank or absent fields are left unchanged.
    #[instrument(skip(self, patch), err)]
    pub async fn update_product(&self, raw_id: &str, patch: ProductPatch) -> ServiceResult<Product> {
        let mut product = self.locate(raw_id).await?;
        patch.apply_to(&mut product)?;
        Ok(self.store.update(product).await?)
    }

    /// Move stock up or down by `amount`. Stock is allowed to go negative.
    #[instrument(skip(self), err)]
    pub async fn update_stock(
        &self,
        raw_id: &str,
        direction: StockDirection,
        amount: i64,
    ) -> ServiceResult<Product> {
        let mut product = self.locate(raw_id).await?;
        product.adjust_stock(direction, amount);
        Ok(self.store.update(product).await?)
    }

    /// Soft-delete a product. Its identifier stays reserved, its name is released.
    #[instrument(skip(self), err)]
    pub async fn delete_product(&self, raw_id: &str) -> ServiceResult<()> {
        let product = self.locate(raw_id).await?;
        self.store.delete(&product.product_id).await?;
        Ok(())
    }

    async fn locate(&self, raw_id: &str) -> ServiceResult<Product> {
        let id = normalize(raw_id)?;
        match self.store.find_active_by_id(&id).await? {
            Some(product) => Ok(product),
            None => Err(DomainError::not_found(id).into()),
        }
    }

    async fn next_identifier(&self) -> ServiceResult<ProductIdentifier> {
        let seq = self.sequence.next().await?;
        let id = encode(self.node, seq);
        debug!(node_id = %self.node, sequence = %seq, product_id = %id, "allocated product identifier");
        Ok(id)
    }
}
