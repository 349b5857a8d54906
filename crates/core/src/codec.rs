//! Identifier codec: node identity + sequence value <-> canonical identifier.

use crate::error::ValidationError;
use crate::id::{IDENTIFIER_WIDTH, NodeIdentity, ProductIdentifier, SEQUENCE_WIDTH, SequenceValue};

/// Build the canonical identifier for a freshly allocated sequence value.
///
/// Total and deterministic: both inputs are range-checked by construction, so the
/// result is always one node digit followed by five sequence digits.
pub fn encode(node: NodeIdentity, seq: SequenceValue) -> ProductIdentifier {
    ProductIdentifier::from_canonical(format!(
        "{}{:0width$}",
        node.get(),
        seq.get(),
        width = SEQUENCE_WIDTH
    ))
}

/// Turn caller-supplied text into a canonical identifier.
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. blank after trimming -> [`ValidationError::EmptyInput`]
/// 2. any non-digit character -> [`ValidationError::NonDigitInput`]
/// 3. more than six digits -> [`ValidationError::TooLong`]
///
/// Shorter inputs are left-padded with zeros, so `"123"` and `"000123"` name the
/// same product.
pub fn normalize(raw: &str) -> Result<ProductIdentifier, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NonDigitInput);
    }

    // All bytes are ASCII digits here, so byte length == character count.
    if trimmed.len() > IDENTIFIER_WIDTH {
        return Err(ValidationError::TooLong);
    }

    Ok(ProductIdentifier::from_canonical(format!(
        "{trimmed:0>width$}",
        width = IDENTIFIER_WIDTH
    )))
}
