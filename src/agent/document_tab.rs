//! In-process tab host over a static HTML document.
//!
//! A [`DocumentTab`] behaves like a browser tab from the delivery
//! strategy's point of view: messages only reach it once an agent is
//! installed, injection and direct execution can be refused, and replies
//! can be slow. Useful for offline scraping of saved pages and for
//! exercising the tiers without a browser.
//!
//! # Example
//!
//! ```
//! use tab_scraper::{DocumentTab, TabId};
//!
//! let tab = DocumentTab::new(
//!     TabId::new(1).unwrap(),
//!     "https://example.com/",
//!     "<h1>Hello</h1>",
//! )
//! .with_agent();
//! assert!(tab.is_agent_loaded());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;

use crate::delivery::TabHost;
use crate::error::{Error, Result};
use crate::extract::{Document, compile_selector, extract_with};
use crate::identifiers::TabId;
use crate::protocol::AgentMessage;
use crate::request::ExtractionRequest;

use super::{ExtractionAgent, PageContext};

// ============================================================================
// Constants
// ============================================================================

/// Transport error text when nothing listens in the tab.
const NO_RECEIVER: &str = "Could not establish connection. Receiving end does not exist.";

// ============================================================================
// TabBehavior
// ============================================================================

/// Failure switches for a [`DocumentTab`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabBehavior {
    /// Refuse agent injection.
    pub block_injection: bool,
    /// Refuse one-shot direct execution.
    pub block_scripts: bool,
    /// Delay before the agent answers a message.
    pub reply_delay: Option<Duration>,
}

// ============================================================================
// DocumentTab
// ============================================================================

/// A tab backed by an HTML string.
#[derive(Debug)]
pub struct DocumentTab {
    tab_id: TabId,
    url: String,
    html: String,
    page: Mutex<PageContext>,
    behavior: TabBehavior,
}

impl DocumentTab {
    /// Creates a tab showing `html` at `url`, with no agent installed.
    #[must_use]
    pub fn new(tab_id: TabId, url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            tab_id,
            url: url.into(),
            html: html.into(),
            page: Mutex::new(PageContext::new()),
            behavior: TabBehavior::default(),
        }
    }

    /// Loads a saved page from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub async fn load(
        tab_id: TabId,
        url: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let html = tokio::fs::read_to_string(path.as_ref()).await?;
        debug!(path = %path.as_ref().display(), bytes = html.len(), "Loaded page");
        Ok(Self::new(tab_id, url, html))
    }

    /// Installs the agent up front, as if the content script had been
    /// declared in the extension manifest.
    #[must_use]
    pub fn with_agent(self) -> Self {
        ExtractionAgent::install(&mut self.page.lock());
        self
    }

    /// Refuses agent injection.
    #[inline]
    #[must_use]
    pub fn block_injection(mut self) -> Self {
        self.behavior.block_injection = true;
        self
    }

    /// Refuses direct execution.
    #[inline]
    #[must_use]
    pub fn block_scripts(mut self) -> Self {
        self.behavior.block_scripts = true;
        self
    }

    /// Delays every agent reply by `delay`.
    #[inline]
    #[must_use]
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.behavior.reply_delay = Some(delay);
        self
    }

    /// Returns the failure switches.
    #[inline]
    #[must_use]
    pub fn behavior(&self) -> TabBehavior {
        self.behavior
    }

    /// Returns `true` once the agent has initialized in this tab.
    #[must_use]
    pub fn is_agent_loaded(&self) -> bool {
        self.page.lock().is_agent_loaded()
    }

    /// Returns the number of message listeners registered in this tab.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.page.lock().listener_count()
    }

    /// Parses the page.
    #[must_use]
    pub fn document(&self) -> Document {
        Document::parse(&self.html, &self.url)
    }

    fn dispatch(&self, message: &AgentMessage) -> Result<Option<Value>> {
        let page = self.page.lock();
        if page.listener_count() == 0 {
            return Err(Error::transport(NO_RECEIVER));
        }
        Ok(page.dispatch(&self.document(), message))
    }

    fn run_direct(&self, request: &ExtractionRequest) -> Result<Value> {
        let selector = compile_selector(request.selector())?;
        let values = extract_with(&self.document(), &selector, request.attribute());
        Ok(serde_json::to_value(values)?)
    }
}

// ============================================================================
// TabHost
// ============================================================================

#[async_trait]
impl TabHost for DocumentTab {
    fn tab_id(&self) -> Option<TabId> {
        Some(self.tab_id)
    }

    async fn url(&self) -> Result<Option<String>> {
        Ok(Some(self.url.clone()))
    }

    async fn send_message(
        &self,
        message: &AgentMessage,
        _bound: Duration,
    ) -> Result<Option<Value>> {
        if let Some(delay) = self.behavior.reply_delay {
            sleep(delay).await;
        }
        self.dispatch(message)
    }

    async fn inject_agent(&self) -> Result<()> {
        if self.behavior.block_injection {
            return Err(Error::injection_failure("Cannot access contents of the page"));
        }
        let installed = ExtractionAgent::install(&mut self.page.lock());
        debug!(tab_id = %self.tab_id, installed, "Agent injected");
        Ok(())
    }

    async fn execute_direct(&self, request: &ExtractionRequest) -> Result<Value> {
        if self.behavior.block_scripts {
            return Err(Error::execution_blocked(
                "Refused to evaluate script: Content Security Policy",
            ));
        }
        self.run_direct(request)
    }
}

// ============================================================================
// Tests
// ============================================================================
