use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::SequenceValue;

/// Smallest value the shared counter hands out.
///
/// The counter starts at 1 and cycles back to 1 after [`SEQUENCE_MAX`]; 0 is a
/// valid [`SequenceValue`] but is never issued.
///
/// [`SEQUENCE_MAX`]: catalog_core::id::SEQUENCE_MAX
pub const SEQUENCE_MIN: u32 = 1;

/// Sequence source failure.
///
/// Always an **infrastructure error**: callers must surface it and never invent a
/// replacement value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("sequence source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Shared, durable, atomically-incrementing counter.
///
/// ## Contract
///
/// - Every call returns a value in `[SEQUENCE_MIN, SEQUENCE_MAX]`.
/// - No value is returned twice between two wraparounds, whatever the number of
///   concurrent callers and nodes.
/// - After `SEQUENCE_MAX` the next value is `SEQUENCE_MIN`.
/// - Values consumed by a caller that later fails are gone; they are not reclaimed.
///
/// The call may suspend on I/O. Implementations perform no retries of their own.
#[async_trait]
pub trait SequenceSource: Send + Sync {
    /// Draw the next value from the counter.
    async fn next(&self) -> Result<SequenceValue, SequenceError>;
}

#[async_trait]
impl<S> SequenceSource for Arc<S>
where
    S: SequenceSource + ?Sized,
{
    async fn next(&self) -> Result<SequenceValue, SequenceError> {
        (**self).next().await
    }
}
