//! Strongly-typed identifiers used across the catalog.
//!
//! A product identifier is six decimal digits: the one-digit identity of the node
//! that allocated it, followed by a zero-padded five-digit value drawn from the
//! shared sequence. Nodes never coordinate; uniqueness comes from distinct node
//! digits plus the sequence never repeating a value within one cycle.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{RangeError, ValidationError};

/// Largest configurable node identity (single decimal digit).
pub const NODE_ID_MAX: u8 = 9;

/// Largest value a sequence may hand out (five decimal digits).
pub const SEQUENCE_MAX: u32 = 99_999;

/// Number of digits reserved for the sequence part of an identifier.
pub const SEQUENCE_WIDTH: usize = 5;

/// Total width of a canonical identifier.
pub const IDENTIFIER_WIDTH: usize = 6;

/// Identity of one running service instance, fixed at process start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeIdentity(u8);

impl NodeIdentity {
    pub fn new(value: u8) -> Result<Self, RangeError> {
        if value > NODE_ID_MAX {
            return Err(RangeError::NodeIdentity(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for NodeIdentity {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= NODE_ID_MAX)
            .map(Self)
            .ok_or(RangeError::NodeIdentity(value))
    }
}

impl core::fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A value handed out by the shared sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SequenceValue(u32);

impl SequenceValue {
    pub fn new(value: u32) -> Result<Self, RangeError> {
        if value > SEQUENCE_MAX {
            return Err(RangeError::SequenceValue(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for SequenceValue {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= SEQUENCE_MAX)
            .map(Self)
            .ok_or(RangeError::SequenceValue(value))
    }
}

impl core::fmt::Display for SequenceValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Canonical six-digit product identifier.
///
/// Only obtainable through [`crate::encode`] or [`crate::normalize`], so every
/// instance is exactly [`IDENTIFIER_WIDTH`] ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductIdentifier(String);

impl ProductIdentifier {
    pub(crate) fn from_canonical(canonical: String) -> Self {
        debug_assert_eq!(canonical.len(), IDENTIFIER_WIDTH);
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductIdentifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::codec::normalize(s)
    }
}

impl TryFrom<String> for ProductIdentifier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        crate::codec::normalize(&value)
    }
}

impl From<ProductIdentifier> for String {
    fn from(value: ProductIdentifier) -> Self {
        value.0
    }
}
