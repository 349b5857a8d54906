use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::ProductIdentifier;
use catalog_products::{AuditFields, Product};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Uniqueness checks and writes happen under one write
/// lock, which mirrors the unique indexes of the Postgres schema.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<BTreeMap<ProductIdentifier, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, including soft-deleted ones.
    ///
    /// Rows are never left half-written, so a poisoned lock still holds a
    /// consistent map and is read through.
    pub fn all_rows(&self) -> Vec<Product> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.values().cloned().collect()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

fn name_taken(
    rows: &BTreeMap<ProductIdentifier, Product>,
    name: &str,
    except: &ProductIdentifier,
) -> bool {
    rows.values()
        .any(|p| p.is_active() && p.name == name && &p.product_id != except)
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows
            .values()
            .find(|p| p.is_active() && p.name == name)
            .cloned())
    }

    async fn find_active_by_id(
        &self,
        id: &ProductIdentifier,
    ) -> Result<Option<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(id).filter(|p| p.is_active()).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().filter(|p| p.is_active()).cloned().collect())
    }

    async fn insert(&self, mut product: Product) -> Result<Product, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        if rows.contains_key(&product.product_id) {
            return Err(StoreError::IdentifierTaken(product.product_id));
        }
        if name_taken(&rows, &product.name, &product.product_id) {
            return Err(StoreError::DuplicateName(product.name));
        }

        product.audit = AuditFields::inserted(Utc::now());
        rows.insert(product.product_id.clone(), product.clone());
        Ok(product)
    }

    async fn update(&self, mut product: Product) -> Result<Product, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        let mut audit = match rows.get(&product.product_id) {
            Some(existing) if existing.is_active() => existing.audit.clone(),
            _ => return Err(StoreError::Missing(product.product_id)),
        };
        if name_taken(&rows, &product.name, &product.product_id) {
            return Err(StoreError::DuplicateName(product.name));
        }

        audit.touch(Utc::now());
        product.audit = audit;
        rows.insert(product.product_id.clone(), product.clone());
        Ok(product)
    }

    async fn delete(&self, id: &ProductIdentifier) -> Result<Product, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        match rows.get_mut(id) {
            Some(existing) if existing.is_active() => {
                existing.audit.deactivate(Utc::now());
                Ok(existing.clone())
            }
            _ => Err(StoreError::Missing(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_products::NewProduct;
    use rust_decimal::Decimal;

    fn id(raw: &str) -> ProductIdentifier {
        catalog_core::normalize(raw).unwrap()
    }

    fn product(raw_id: &str, name: &str) -> Product {
        Product::new(
            id(raw_id),
            NewProduct {
                name: name.to_string(),
                description: None,
                unit_price: Decimal::new(500, 2),
                stock: 3,
            },
        )
    }

    #[tokio::test]
    async fn insert_stamps_audit_fields() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(product("1", "Widget")).await.unwrap();

        assert!(stored.is_active());
        assert_eq!(stored.audit.last_modified_at, None);
        assert_eq!(store.find_active_by_id(&id("1")).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_active_name() {
        let store = InMemoryProductStore::new();
        store.insert(product("1", "Widget")).await.unwrap();

        let err = store.insert(product("2", "Widget")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("Widget".to_string()));
        assert_eq!(store.all_rows().len(), 1);
    }

    #[tokio::test]
    async fn name_match_is_case_sensitive() {
        let store = InMemoryProductStore::new();
        store.insert(product("1", "Widget")).await.unwrap();
        store.insert(product("2", "widget")).await.unwrap();

        assert_eq!(store.list_active().await.unwrap().len(), 2);
        assert!(store.find_active_by_name("WIDGET").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_reused_identifier_even_after_delete() {
        let store = InMemoryProductStore::new();
        store.insert(product("1", "Widget")).await.unwrap();
        store.delete(&id("1")).await.unwrap();

        let err = store.insert(product("1", "Gadget")).await.unwrap_err();
        assert_eq!(err, StoreError::IdentifierTaken(id("1")));
    }

    #[tokio::test]
    async fn delete_hides_product_and_releases_name() {
        let store = InMemoryProductStore::new();
        store.insert(product("1", "Widget")).await.unwrap();

        let deleted = store.delete(&id("1")).await.unwrap();
        assert!(!deleted.is_active());
        assert!(deleted.audit.last_modified_at.is_some());

        assert!(store.find_active_by_id(&id("1")).await.unwrap().is_none());
        assert!(store.find_active_by_name("Widget").await.unwrap().is_none());
        assert!(store.list_active().await.unwrap().is_empty());

        store.insert(product("2", "Widget")).await.unwrap();
        assert_eq!(store.all_rows().len(), 2);
    }

    #[tokio::test]
    async fn update_preserves_creation_audit_and_touches_modification() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(product("1", "Widget")).await.unwrap();

        let mut changed = stored.clone();
        changed.stock = 42;
        changed.audit = AuditFields::default();

        let updated = store.update(changed).await.unwrap();
        assert_eq!(updated.stock, 42);
        assert!(updated.is_active());
        assert_eq!(updated.audit.created_at, stored.audit.created_at);
        assert!(updated.audit.last_modified_at.is_some());
    }

    #[tokio::test]
    async fn update_rejects_rename_onto_active_name() {
        let store = InMemoryProductStore::new();
        store.insert(product("1", "Widget")).await.unwrap();
        let gadget = store.insert(product("2", "Gadget")).await.unwrap();

        let renamed = Product {
            name: "Widget".to_string(),
            ..gadget
        };
        let err = store.update(renamed).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("Widget".to_string()));
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_rows_fail() {
        let store = InMemoryProductStore::new();
        assert_eq!(
            store.update(product("9", "Ghost")).await.unwrap_err(),
            StoreError::Missing(id("9"))
        );
        assert_eq!(
            store.delete(&id("9")).await.unwrap_err(),
            StoreError::Missing(id("9"))
        );
    }

    #[tokio::test]
    async fn all_rows_survives_poisoned_lock() {
        let store = std::sync::Arc::new(InMemoryProductStore::new());
        store.insert(product("1", "Widget")).await.unwrap();

        let poisoner = store.clone();
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.rows.write().unwrap();
            panic!("writer died while holding the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(store.rows.is_poisoned());

        let rows = store.all_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Widget");
    }

    #[tokio::test]
    async fn list_is_ordered_by_identifier() {
        let store = InMemoryProductStore::new();
        store.insert(product("300", "C")).await.unwrap();
        store.insert(product("100", "A")).await.unwrap();
        store.insert(product("200", "B")).await.unwrap();

        let ids: Vec<String> = store
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_id.to_string())
            .collect();
        assert_eq!(ids, vec!["000100", "000200", "000300"]);
    }
}
