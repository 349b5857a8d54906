use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use catalog_core::SequenceValue;
use catalog_core::id::SEQUENCE_MAX;

use super::r#trait::{SEQUENCE_MIN, SequenceError, SequenceSource};

/// Process-local cyclic counter.
///
/// Intended for tests/dev. It is only collision-free within a single process: two
/// instances never see each other's values, so multi-node deployments must use
/// [`super::PostgresSequenceSource`].
#[derive(Debug, Default)]
pub struct InMemorySequenceSource {
    /// Last value handed out; 0 before the first call.
    last: AtomicU32,
}

impl InMemorySequenceSource {
    /// Counter whose first value will be `SEQUENCE_MIN`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter positioned as if `last` had just been handed out.
    ///
    /// Values above `SEQUENCE_MAX` are clamped to it.
    pub fn starting_after(last: u32) -> Self {
        Self {
            last: AtomicU32::new(last.min(SEQUENCE_MAX)),
        }
    }

    /// Last value handed out, if any.
    pub fn current(&self) -> Option<u32> {
        match self.last.load(Ordering::Acquire) {
            0 => None,
            v => Some(v),
        }
    }

    fn successor(last: u32) -> u32 {
        if last >= SEQUENCE_MAX { SEQUENCE_MIN } else { last + 1 }
    }
}

#[async_trait]
impl SequenceSource for InMemorySequenceSource {
    async fn next(&self) -> Result<SequenceValue, SequenceError> {
        // CAS loop: concurrent callers each observe a distinct predecessor.
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(Self::successor(last))
            })
            .map_err(|_| SequenceError::SourceUnavailable("counter update rejected".to_string()))?;

        let next = Self::successor(prev);
        if prev == SEQUENCE_MAX {
            tracing::warn!(value = next, "product id sequence wrapped around");
        }

        SequenceValue::new(next).map_err(|e| SequenceError::SourceUnavailable(e.to_string()))
    }
}
