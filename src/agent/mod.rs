//! The in-page extraction agent.
//!
//! The agent is a message listener that answers `scrape` messages by
//! running the extractor against the page. A [`PageContext`] models a
//! tab's script-visible state: the listeners registered on it and the
//! agent's one-time initialization flag.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `assets` | JavaScript agent and direct-execution sources |
//! | `document_tab` | In-process [`TabHost`](crate::TabHost) over an HTML document |

// ============================================================================
// Submodules
// ============================================================================

/// JavaScript sources for the extension.
pub mod assets;

/// In-process tab host.
pub mod document_tab;

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};
use tracing::{debug, error};

use crate::extract::{Document, compile_selector, extract_with};
use crate::protocol::AgentMessage;

pub use document_tab::DocumentTab;

// ============================================================================
// Types
// ============================================================================

/// A registered message listener.
///
/// Returns `Some(reply)` to answer the message.
pub type Listener = Box<dyn Fn(&Document, &AgentMessage) -> Option<Value> + Send + Sync>;

// ============================================================================
// PageContext
// ============================================================================

/// Script-visible state of one page.
#[derive(Default)]
pub struct PageContext {
    agent_loaded: bool,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("agent_loaded", &self.agent_loaded)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PageContext {
    /// Creates an empty page context.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the agent has initialized.
    #[inline]
    #[must_use]
    pub fn is_agent_loaded(&self) -> bool {
        self.agent_loaded
    }

    /// Returns the number of registered listeners.
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Offers `message` to every listener; the first reply wins.
    ///
    /// Returns `None` if no listener answered.
    pub fn dispatch(&self, document: &Document, message: &AgentMessage) -> Option<Value> {
        let mut reply = None;
        for listener in &self.listeners {
            let answer = listener(document, message);
            if reply.is_none() {
                reply = answer;
            }
        }
        reply
    }
}

// ============================================================================
// ExtractionAgent
// ============================================================================

/// The scrape message handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionAgent;

impl ExtractionAgent {
    /// Installs the agent into `page`.
    ///
    /// Returns `false` without registering anything if the agent is
    /// already loaded, so repeated injection leaves exactly one listener.
    pub fn install(page: &mut PageContext) -> bool {
        if page.agent_loaded {
            debug!("Extraction agent already loaded");
            return false;
        }

        page.agent_loaded = true;
        page.add_listener(Box::new(Self::handle));
        debug!("Extraction agent ready for messages");
        true
    }

    /// Answers a message against `document`.
    ///
    /// Extraction errors are logged and answered with an empty list.
    #[must_use]
    pub fn handle(document: &Document, message: &AgentMessage) -> Option<Value> {
        match message {
            AgentMessage::Scrape {
                selector,
                attribute,
            } => {
                debug!(selector = %selector, attribute = %attribute, "Agent received scrape");
                let values = match compile_selector(selector) {
                    Ok(sel) => extract_with(document, &sel, attribute).into_vec(),
                    Err(e) => {
                        error!(error = %e, "Agent scrape failed");
                        Vec::new()
                    }
                };
                Some(json!(values))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::extract::Attribute;

    fn scrape(selector: &str, attribute: &str) -> AgentMessage {
        AgentMessage::Scrape {
            selector: selector.to_string(),
            attribute: Attribute::parse(attribute),
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut page = PageContext::new();
        assert!(ExtractionAgent::install(&mut page));
        assert!(!ExtractionAgent::install(&mut page));
        assert!(page.is_agent_loaded());
        assert_eq!(page.listener_count(), 1);
    }

    #[test]
    fn test_dispatch_without_listeners() {
        let page = PageContext::new();
        let doc = Document::parse("<h1>x</h1>", "https://example.com/");
        assert_eq!(page.dispatch(&doc, &scrape("h1", "textContent")), None);
    }

    #[test]
    fn test_agent_answers_scrape() {
        let mut page = PageContext::new();
        ExtractionAgent::install(&mut page);
        let doc = Document::parse("<h1>One</h1><h2>Two</h2>", "https://example.com/");

        let reply = page.dispatch(&doc, &scrape("h1, h2", "textContent"));
        assert_eq!(reply, Some(json!(["One", "Two"])));
    }

    #[test]
    fn test_agent_answers_empty_on_bad_selector() {
        let doc = Document::parse("<h1>One</h1>", "https://example.com/");
        let reply = ExtractionAgent::handle(&doc, &scrape("h1[", "textContent"));
        assert_eq!(reply, Some(json!([])));
    }

    #[test]
    fn test_first_reply_wins() {
        let mut page = PageContext::new();
        page.add_listener(Box::new(|_, _| None));
        page.add_listener(Box::new(|_, _| Some(json!(["first"]))));
        page.add_listener(Box::new(|_, _| Some(json!(["second"]))));
        let doc = Document::parse("", "https://example.com/");

        assert_eq!(
            page.dispatch(&doc, &scrape("p", "textContent")),
            Some(json!(["first"]))
        );
    }
}
