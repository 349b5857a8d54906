//! `catalog-core`: identifier scheme and shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the node-prefixed product identifier, its codec, the domain error model and the
//! uniform success/failure envelope consumed by the HTTP boundary.

pub mod codec;
pub mod error;
pub mod id;
pub mod outcome;

pub use codec::{encode, normalize};
pub use error::{DomainError, DomainResult, RangeError, ValidationError};
pub use id::{NodeIdentity, ProductIdentifier, SequenceValue};
pub use outcome::Outcome;
