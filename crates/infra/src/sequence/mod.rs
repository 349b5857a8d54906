//! Shared identifier counter boundary.
//!
//! This module defines the contract the catalog relies on for cross-node
//! uniqueness, with a Postgres implementation for deployments and an in-memory
//! one for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemorySequenceSource;
pub use postgres::{PostgresSequenceSource, PRODUCT_ID_SEQUENCE};
pub use r#trait::{SEQUENCE_MIN, SequenceError, SequenceSource};
