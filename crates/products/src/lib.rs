//! Products domain module.
//!
//! This crate contains the business rules for catalog products, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage). Identifiers are
//! allocated elsewhere; a product only ever receives one.

pub mod product;

pub use product::{AuditFields, NewProduct, Product, ProductPatch, StockDirection};
