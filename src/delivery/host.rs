//! The seam between the delivery strategy and a browser tab.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::TabId;
use crate::protocol::AgentMessage;
use crate::request::ExtractionRequest;

// ============================================================================
// Constants
// ============================================================================

/// Address prefixes of pages scripts cannot reach.
///
/// Browser-internal pages, then the two extension-page schemes.
pub const RESTRICTED_PREFIXES: [&str; 3] = ["chrome://", "chrome-extension://", "moz-extension://"];

// ============================================================================
// TabHost
// ============================================================================

/// Operations the delivery tiers need from a tab.
///
/// Implementations report failures as errors; the strategy decides which
/// ones fall through.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Returns the tab ID, if the host has one.
    fn tab_id(&self) -> Option<TabId>;

    /// Returns the tab's current address, `None` when unknown.
    async fn url(&self) -> Result<Option<String>>;

    /// Sends `message` to the agent running in the tab.
    ///
    /// `Ok(None)` means the message was delivered but nobody answered.
    /// `bound` is the caller's reply deadline; hosts may use it to clean
    /// up, the caller enforces it regardless.
    async fn send_message(&self, message: &AgentMessage, bound: Duration)
    -> Result<Option<Value>>;

    /// Installs the extraction agent in the tab.
    async fn inject_agent(&self) -> Result<()>;

    /// Runs the extractor once inside the tab, returning its raw value.
    async fn execute_direct(&self, request: &ExtractionRequest) -> Result<Value>;
}

// ============================================================================
// Functions
// ============================================================================

/// Returns `true` if `url` belongs to a restricted scheme.
#[must_use]
pub fn is_restricted(url: &str) -> bool {
    RESTRICTED_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_schemes() {
        assert!(is_restricted("chrome://settings"));
        assert!(is_restricted("chrome-extension://abcdef/popup.html"));
        assert!(is_restricted("moz-extension://1234/options.html"));
    }

    #[test]
    fn test_regular_pages_allowed() {
        assert!(!is_restricted("https://example.com/"));
        assert!(!is_restricted("http://localhost:8080/chrome://x"));
        assert!(!is_restricted("file:///tmp/page.html"));
    }
}
