//! JavaScript shipped to the extension.
//!
//! The same scraping function backs both the long-lived content-script
//! agent (tiers 1 and 2) and the one-shot direct execution (tier 3), so the
//! value rules cannot drift between tiers.
//!
//! # Scripts
//!
//! | Item | Used by |
//! |------|---------|
//! | [`agent_script`] | Content script file [`AGENT_FILE`] bundled with the extension |
//! | [`direct_script`] | `scripting.executeScript` payload |

// ============================================================================
// Imports
// ============================================================================

use crate::error::Result;
use crate::request::ExtractionRequest;

// ============================================================================
// Constants
// ============================================================================

/// File name of the agent inside the extension package.
pub const AGENT_FILE: &str = "content.js";

/// Page-global flag set once the agent has registered its listener.
pub const AGENT_LOADED_FLAG: &str = "__tabScraperAgentLoaded";

/// `scrapeValues(selector, attribute)`: the in-page extractor.
const SCRAPE_FUNCTION: &str = r#"function scrapeValues(selector, attribute) {
  const base = document.baseURI;
  const absolutize = (value, keep) => {
    if (!value || value.startsWith('http') || keep.some((p) => value.startsWith(p))) {
      return value;
    }
    try {
      return new URL(value, base).href;
    } catch (e) {
      console.warn('URL conversion failed:', e);
      return value;
    }
  };
  const resolvers = {
    textContent: (el) => (el.textContent || '').trim(),
    innerHTML: (el) => el.innerHTML || '',
    href: (el) => absolutize(el.href || el.getAttribute('href') || '', ['mailto:', 'tel:', '#']),
    src: (el) => absolutize(el.src || el.getAttribute('src') || '', ['data:']),
    alt: (el) => el.alt || el.getAttribute('alt') || '',
    title: (el) => el.title || el.getAttribute('title') || '',
    className: (el) => el.getAttribute('class') || '',
  };
  const resolve = Object.prototype.hasOwnProperty.call(resolvers, attribute)
    ? resolvers[attribute]
    : (el) => el.getAttribute(attribute) || '';
  const values = [];
  document.querySelectorAll(selector).forEach((el, index) => {
    try {
      const value = String(resolve(el)).trim();
      if (value) {
        values.push(value);
      }
    } catch (e) {
      console.warn('Error processing element ' + index, e);
    }
  });
  return values;
}"#;

/// Listener registration, guarded by [`AGENT_LOADED_FLAG`].
const AGENT_BOOTSTRAP: &str = r#"if (!window.$FLAG) {
  window.$FLAG = true;
  chrome.runtime.onMessage.addListener((request, sender, sendResponse) => {
    if (!request || request.action !== 'scrape') {
      return false;
    }
    try {
      sendResponse(scrapeValues(request.selector, request.attribute));
    } catch (e) {
      console.error('Scrape failed:', e);
      sendResponse([]);
    }
    return false;
  });
}"#;

// ============================================================================
// Public Functions
// ============================================================================

/// Returns the content-script source for [`AGENT_FILE`].
#[must_use]
pub fn agent_script() -> String {
    format!(
        "{SCRAPE_FUNCTION}\n\n{}\n",
        AGENT_BOOTSTRAP.replace("$FLAG", AGENT_LOADED_FLAG)
    )
}

/// Returns a self-contained expression that scrapes `request` once.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if an argument cannot be
/// encoded.
pub fn direct_script(request: &ExtractionRequest) -> Result<String> {
    Ok(format!(
        "({SCRAPE_FUNCTION})({}, {})",
        json_string(request.selector())?,
        json_string(request.attribute().as_str())?
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encodes a string as a JavaScript string literal.
fn json_string(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_script_is_guarded() {
        let script = agent_script();
        assert!(script.contains("function scrapeValues"));
        assert!(script.contains(&format!("if (!window.{AGENT_LOADED_FLAG})")));
        assert!(script.contains(&format!("window.{AGENT_LOADED_FLAG} = true")));
        assert!(!script.contains("$FLAG"));
    }

    #[test]
    fn test_direct_script_embeds_arguments() {
        let request = ExtractionRequest::new("a[href]", "href").expect("valid");
        let script = direct_script(&request).expect("script");
        assert!(script.starts_with("(function scrapeValues"));
        assert!(script.ends_with(r#")("a[href]", "href")"#));
    }

    #[test]
    fn test_direct_script_escapes_quotes() {
        let request = ExtractionRequest::new(r#"a[title="x"]"#, "title").expect("valid");
        let script = direct_script(&request).expect("script");
        assert!(script.contains(r#""a[title=\"x\"]""#));
    }

    #[test]
    fn test_direct_script_escapes_control_characters() {
        let request = ExtractionRequest::new("a", "data-x\\y\nz").expect("valid");
        let script = direct_script(&request).expect("script");
        assert!(script.ends_with(r#")("a", "data-x\\y\nz")"#));
    }

    #[test]
    fn test_resolver_names_match_named_attributes() {
        for named in crate::extract::NamedAttribute::ALL {
            assert!(
                SCRAPE_FUNCTION.contains(&format!("    {}: (el)", named.as_str())),
                "missing JS resolver for {}",
                named.as_str()
            );
        }
    }
}
