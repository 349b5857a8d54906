use std::sync::Arc;

use anyhow::Context;

use catalog_core::NodeIdentity;
use catalog_infra::{
    AppConfig, ProductKeyService, db,
    product_store::{InMemoryProductStore, PostgresProductStore, ProductStore},
    sequence::{InMemorySequenceSource, PostgresSequenceSource, SequenceSource},
};

/// Product service over type-erased collaborators, so one router type serves
/// both backends.
pub type DynProductService = ProductKeyService<Arc<dyn ProductStore>, Arc<dyn SequenceSource>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    InMemory,
    Postgres,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::InMemory => "in-memory",
            Backend::Postgres => "postgres",
        }
    }
}

/// Everything the handlers need, shared through an `Extension`.
pub struct AppServices {
    pub products: DynProductService,
    backend: Backend,
}

impl AppServices {
    pub fn new(products: DynProductService, backend: Backend) -> Self {
        Self { products, backend }
    }

    /// In-memory store and sequence (dev/test). Only correct for a single node.
    pub fn in_memory(node: NodeIdentity) -> Self {
        let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());
        let sequence: Arc<dyn SequenceSource> = Arc::new(InMemorySequenceSource::new());
        Self::new(ProductKeyService::new(node, store, sequence), Backend::InMemory)
    }

    pub fn node(&self) -> NodeIdentity {
        self.products.node()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

/// Wire collaborators from configuration.
///
/// With `DATABASE_URL` set, both the store and the sequence live in Postgres and
/// the schema is bootstrapped before the first request. Otherwise everything is
/// in-memory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url, config.db_max_connections)
                .await
                .context("failed to connect to Postgres")?;
            db::ensure_schema(&pool)
                .await
                .context("failed to bootstrap product schema")?;

            let store: Arc<dyn ProductStore> = Arc::new(PostgresProductStore::new(pool.clone()));
            let sequence: Arc<dyn SequenceSource> = Arc::new(PostgresSequenceSource::new(pool));
            AppServices::new(
                ProductKeyService::new(config.node_id, store, sequence),
                Backend::Postgres,
            )
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; using in-memory store and sequence (single node only)"
            );
            AppServices::in_memory(config.node_id)
        }
    };

    tracing::info!(
        node_id = %services.node(),
        backend = services.backend().as_str(),
        "product services ready"
    );
    Ok(services)
}
