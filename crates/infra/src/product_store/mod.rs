//! Product persistence boundary.
//!
//! A narrow, product-specific store interface (no generic repository), with a
//! Postgres implementation and an in-memory one for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
