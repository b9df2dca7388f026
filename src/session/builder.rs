//! Builder for [`Session`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use tab_scraper::{DeliveryConfig, DocumentTab, Session, StatusLog, TabId};
//!
//! # fn example() -> tab_scraper::Result<()> {
//! let tab = DocumentTab::new(TabId::new(1).unwrap(), "https://example.com/", "<h1>Hi</h1>");
//! let session = Session::builder(tab)
//!     .config(DeliveryConfig::new().with_settle_delay(Duration::from_millis(100)))
//!     .status(Arc::new(StatusLog::new()))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use crate::delivery::{DeliveryConfig, DeliveryStrategy, TabHost};
use crate::error::Result;
use crate::status::{StatusSink, TracingStatus};

use super::{Session, SessionCache};

// ============================================================================
// SessionBuilder
// ============================================================================

/// Configures a [`Session`].
///
/// Defaults: [`DeliveryConfig::default`] and [`TracingStatus`].
pub struct SessionBuilder<H> {
    host: H,
    config: DeliveryConfig,
    status: Arc<dyn StatusSink>,
}

impl<H: TabHost> SessionBuilder<H> {
    /// Creates a builder over `host`.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: DeliveryConfig::default(),
            status: Arc::new(TracingStatus),
        }
    }

    /// Sets the delivery timeouts.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: DeliveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the status display.
    #[inline]
    #[must_use]
    pub fn status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    /// Builds the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the delivery
    /// configuration is invalid.
    pub fn build(self) -> Result<Session<H>> {
        self.config.validate()?;

        Ok(Session {
            host: self.host,
            strategy: DeliveryStrategy::new(self.config),
            status: self.status,
            cache: SessionCache::new(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::agent::DocumentTab;
    use crate::error::Error;
    use crate::identifiers::TabId;

    fn tab() -> DocumentTab {
        DocumentTab::new(TabId::new(1).expect("valid"), "https://example.com/", "")
    }

    #[test]
    fn test_defaults() {
        let session = SessionBuilder::new(tab()).build().expect("build");
        assert!(session.cache().get().is_none());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = SessionBuilder::new(tab())
            .config(DeliveryConfig::new().with_agent_timeout(Duration::ZERO))
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
