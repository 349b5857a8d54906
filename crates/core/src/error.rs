//! Domain error model.

use thiserror::Error;

use crate::id::{NODE_ID_MAX, ProductIdentifier, SEQUENCE_MAX};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Malformed identifier input.
///
/// The messages are part of the observable API: clients match on them, so they
/// must stay byte-for-byte stable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product ID cannot be empty.")]
    EmptyInput,

    #[error("Product ID must contain only digits.")]
    NonDigitInput,

    #[error("Product ID cannot be longer than 6 digits.")]
    TooLong,
}

/// A numeric component of an identifier was outside its fixed range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("Node ID in configuration must be between 0 and {max}. Current value: {0}", max = NODE_ID_MAX)]
    NodeIdentity(i64),

    #[error("sequence value must be between 0 and {max}, got {0}", max = SEQUENCE_MAX)]
    SequenceValue(i64),
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// uniqueness, lookups). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The identifier supplied by the caller could not be normalized.
    #[error(transparent)]
    InvalidIdentifier(#[from] ValidationError),

    /// A product field failed validation.
    #[error("{0}")]
    Validation(String),

    /// An active product with the same name already exists.
    #[error("Product with same name, already Exists")]
    DuplicateName,

    /// No active product carries the (canonical) identifier.
    #[error("Product with Id: {0}, not found.")]
    NotFound(ProductIdentifier),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(id: ProductIdentifier) -> Self {
        Self::NotFound(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_stable() {
        assert_eq!(ValidationError::EmptyInput.to_string(), "Product ID cannot be empty.");
        assert_eq!(
            ValidationError::NonDigitInput.to_string(),
            "Product ID must contain only digits."
        );
        assert_eq!(
            ValidationError::TooLong.to_string(),
            "Product ID cannot be longer than 6 digits."
        );
    }

    #[test]
    fn invalid_identifier_surfaces_validation_message_verbatim() {
        let err = DomainError::from(ValidationError::NonDigitInput);
        assert_eq!(err.to_string(), "Product ID must contain only digits.");
    }

    #[test]
    fn not_found_echoes_canonical_identifier() {
        let id = crate::normalize("123456").unwrap();
        assert_eq!(
            DomainError::not_found(id).to_string(),
            "Product with Id: 123456, not found."
        );
    }

    #[test]
    fn node_range_error_names_the_bounds() {
        assert_eq!(
            RangeError::NodeIdentity(12).to_string(),
            "Node ID in configuration must be between 0 and 9. Current value: 12"
        );
    }
}
