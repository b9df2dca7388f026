//! Delivery timing configuration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tab_scraper::DeliveryConfig;
//!
//! let config = DeliveryConfig::new().with_agent_timeout(Duration::from_secs(1));
//! assert!(config.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Reply bound when messaging an already running agent.
pub const AGENT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Pause after injecting the agent before messaging it.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Reply bound when messaging a freshly injected agent.
pub const INJECTED_TIMEOUT: Duration = Duration::from_millis(5000);

// ============================================================================
// DeliveryConfig
// ============================================================================

/// Timeouts and delays used by the delivery tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Tier 1 reply bound.
    pub agent_timeout: Duration,
    /// Tier 2 pause between injection and messaging.
    pub settle_delay: Duration,
    /// Tier 2 reply bound.
    pub injected_timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl DeliveryConfig {
    /// Creates a config with the standard timings (3000 ms / 500 ms / 5000 ms).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            agent_timeout: AGENT_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            injected_timeout: INJECTED_TIMEOUT,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl DeliveryConfig {
    /// Sets the Tier 1 reply bound.
    #[inline]
    #[must_use]
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    /// Sets the Tier 2 settle delay.
    #[inline]
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the Tier 2 reply bound.
    #[inline]
    #[must_use]
    pub fn with_injected_timeout(mut self, timeout: Duration) -> Self {
        self.injected_timeout = timeout;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DeliveryConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a reply bound is zero.
    pub fn validate(&self) -> Result<()> {
        if self.agent_timeout.is_zero() {
            return Err(Error::config("agent timeout must be greater than zero"));
        }
        if self.injected_timeout.is_zero() {
            return Err(Error::config("injected timeout must be greater than zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.agent_timeout.as_millis(), 3000);
        assert_eq!(config.settle_delay.as_millis(), 500);
        assert_eq!(config.injected_timeout.as_millis(), 5000);
    }

    #[test]
    fn test_builder_chain() {
        let config = DeliveryConfig::new()
            .with_agent_timeout(Duration::from_millis(10))
            .with_settle_delay(Duration::ZERO)
            .with_injected_timeout(Duration::from_millis(20));

        assert_eq!(config.agent_timeout, Duration::from_millis(10));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.injected_timeout, Duration::from_millis(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = DeliveryConfig::new().with_agent_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        let config = DeliveryConfig::new().with_injected_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
