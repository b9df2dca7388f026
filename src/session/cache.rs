//! Single-slot holder for the last extraction result.

use crate::request::ExtractionResult;

/// Holds the most recent [`ExtractionResult`] of a session.
///
/// Exclusive access goes through `&mut self`; there is no lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCache {
    last: Option<ExtractionResult>,
}

impl SessionCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held result and returns the stored value.
    pub fn store(&mut self, result: ExtractionResult) -> &ExtractionResult {
        self.last.insert(result)
    }

    /// Returns the held result, `None` before the first store.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&ExtractionResult> {
        self.last.as_ref()
    }

    /// Returns `true` if there is nothing worth exporting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last.as_ref().is_none_or(|r| r.is_empty())
    }

    /// Drops the held result.
    pub fn clear(&mut self) {
        self.last = None;
    }
}
