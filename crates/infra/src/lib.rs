//! Infrastructure layer: configuration, Postgres wiring, persistence adapters and
//! the product application service.

pub mod config;
pub mod db;
pub mod product_service;
pub mod product_store;
pub mod sequence;

pub use config::{AppConfig, ConfigError};
pub use product_service::{ProductKeyService, ServiceError, ServiceResult};
