//! Selector-driven value extraction.
//!
//! The extractor is a pure function over a parsed [`Document`]: it selects
//! every element matching a CSS selector, resolves one value per element
//! through the requested [`Attribute`], trims it, and keeps the non-empty
//! ones in document order.
//!
//! # Example
//!
//! ```
//! use tab_scraper::extract::{Document, extract};
//!
//! let doc = Document::parse(
//!     r#"<a href="/about">About</a><a href="mailto:a@example.com">Mail</a>"#,
//!     "https://example.com/page",
//! );
//! let links = extract(&doc, "a[href]", "href").unwrap();
//! assert_eq!(links.as_slice(), ["https://example.com/about", "mailto:a@example.com"]);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `attribute` | Attribute names and resolver table |
//! | `resolve` | Absolute-URL normalization |

// ============================================================================
// Submodules
// ============================================================================

/// Attribute names and resolvers.
pub mod attribute;

/// URL normalization for `href`/`src`.
pub mod resolve;

// ============================================================================
// Imports
// ============================================================================

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::request::ExtractionResult;

pub use attribute::{Attribute, NamedAttribute};

// ============================================================================
// Constants
// ============================================================================

/// Number of leading values echoed to the debug log.
const LOGGED_VALUES: usize = 5;

/// Characters of each echoed value.
const LOGGED_VALUE_CHARS: usize = 50;

/// Selector counted by the diagnostics.
const HEADING_SELECTOR: &str = "h1, h2, h3";

// ============================================================================
// Document
// ============================================================================

/// A parsed page together with its base location.
///
/// Parsed HTML is not `Send`; build a `Document` where it is used and do
/// not hold one across an `.await`.
pub struct Document {
    html: Html,
    url: String,
    base: Option<Url>,
}

impl Document {
    /// Parses `html` as the page loaded at `url`.
    ///
    /// The base location is the page URL, overridden by the first
    /// `<base href>` when present. An unparseable page URL leaves the
    /// document without a base; relative values are then kept as-is.
    #[must_use]
    pub fn parse(html: &str, url: &str) -> Self {
        let html = Html::parse_document(html);
        let page = Url::parse(url).ok();
        let base = base_href(&html)
            .and_then(|href| match &page {
                Some(page) => page.join(&href).ok(),
                None => Url::parse(&href).ok(),
            })
            .or(page);

        Self {
            html,
            url: url.to_string(),
            base,
        }
    }

    /// Returns the page URL as given.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the base location used for URL resolution.
    #[inline]
    #[must_use]
    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Returns the parsed tree.
    #[inline]
    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Collects a quick health report about the page.
    #[must_use]
    pub fn diagnostics(&self) -> PageDiagnostics {
        let count = |selector: &str| {
            Selector::parse(selector)
                .map(|sel| self.html.select(&sel).count())
                .unwrap_or(0)
        };

        PageDiagnostics {
            url: self.url.clone(),
            total_elements: count("*"),
            heading_matches: count(HEADING_SELECTOR),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("base", &self.base.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

/// Page health report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDiagnostics {
    /// Page URL.
    pub url: String,
    /// Number of elements in the document.
    pub total_elements: usize,
    /// Matches for `h1, h2, h3`.
    pub heading_matches: usize,
}

// ============================================================================
// Extraction
// ============================================================================

/// Parses a CSS selector, mapping parser errors to [`Error::InvalidSelector`].
///
/// # Errors
///
/// - [`Error::EmptySelector`] if the selector is blank
/// - [`Error::InvalidSelector`] if it does not parse
pub fn compile_selector(selector: &str) -> Result<Selector> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptySelector);
    }
    Selector::parse(trimmed).map_err(|e| Error::invalid_selector(trimmed, e.to_string()))
}

/// Extracts one trimmed, non-empty value per matching element.
///
/// # Errors
///
/// Only selector errors; per-element failures are logged and skipped.
pub fn extract(document: &Document, selector: &str, attribute: &str) -> Result<ExtractionResult> {
    let selector = compile_selector(selector)?;
    Ok(extract_with(document, &selector, &Attribute::parse(attribute)))
}

/// Extracts with an already compiled selector and parsed attribute.
#[must_use]
pub fn extract_with(
    document: &Document,
    selector: &Selector,
    attribute: &Attribute,
) -> ExtractionResult {
    let base = document.base();
    collect_values(document.html().select(selector), |element| {
        attribute.resolve(element, base)
    })
}

/// Runs `resolve` over each element, isolating per-element failures.
fn collect_values<'a, I, F>(elements: I, resolve: F) -> ExtractionResult
where
    I: Iterator<Item = ElementRef<'a>>,
    F: Fn(ElementRef<'a>) -> Result<String>,
{
    let mut values = Vec::new();
    let mut matched = 0usize;

    for (index, element) in elements.enumerate() {
        matched += 1;

        let raw = match resolve(element) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(index, error = %e, "Error processing element");
                continue;
            }
        };

        let value = raw.trim();
        if value.is_empty() {
            continue;
        }

        if index < LOGGED_VALUES {
            let preview: String = value.chars().take(LOGGED_VALUE_CHARS).collect();
            debug!(element = index + 1, value = %preview, "Extracted value");
        }

        values.push(value.to_string());
    }

    debug!(matched, returned = values.len(), "Extraction finished");
    ExtractionResult::from(values)
}

// ============================================================================
// Helpers
// ============================================================================

/// First `<base href>` in the document.
fn base_href(html: &Html) -> Option<String> {
    let sel = Selector::parse("base[href]").ok()?;
    html.select(&sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
        <head><title>Fixture</title></head>
        <body>
            <h1>  Main heading </h1>
            <h2></h2>
            <h2>   </h2>
            <h3>Sub <em>heading</em></h3>
            <a href="/about">About</a>
            <a href="mailto:a@example.com">Mail</a>
            <a href="tel:+15550000">Call</a>
            <a href="">Empty</a>
            <img src="/logo.png" alt="Logo">
            <img src="data:image/png;base64,AAAA">
            <div class="card featured" data-id="7" title="First card">One</div>
            <div class="card" data-id="8">Two</div>
        </body>
        </html>
    "#;

    fn doc() -> Document {
        Document::parse(PAGE, "https://example.com/page")
    }

    #[test]
    fn test_text_content_skips_blank_elements() {
        let values = extract(&doc(), "h1, h2, h3", "textContent").expect("extract");
        assert_eq!(values.as_slice(), ["Main heading", "Sub heading"]);
    }

    #[test]
    fn test_href_resolution_and_pass_through() {
        let values = extract(&doc(), "a[href]", "href").expect("extract");
        assert_eq!(
            values.as_slice(),
            [
                "https://example.com/about",
                "mailto:a@example.com",
                "tel:+15550000",
                "https://example.com/page",
            ]
        );
    }

    #[test]
    fn test_src_resolution() {
        let values = extract(&doc(), "img", "src").expect("extract");
        assert_eq!(
            values.as_slice(),
            ["https://example.com/logo.png", "data:image/png;base64,AAAA"]
        );
    }

    #[test]
    fn test_alt_title_class_generic() {
        let doc = doc();
        assert_eq!(extract(&doc, "img", "alt").expect("alt").as_slice(), ["Logo"]);
        assert_eq!(
            extract(&doc, ".card", "title").expect("title").as_slice(),
            ["First card"]
        );
        assert_eq!(
            extract(&doc, ".card", "className").expect("class").as_slice(),
            ["card featured", "card"]
        );
        assert_eq!(
            extract(&doc, ".card", "data-id").expect("generic").as_slice(),
            ["7", "8"]
        );
    }

    #[test]
    fn test_inner_html_is_trimmed() {
        let doc = Document::parse("<ul><li>  <b>x</b>  </li></ul>", "https://example.com/");
        let values = extract(&doc, "li", "innerHTML").expect("extract");
        assert_eq!(values.as_slice(), ["<b>x</b>"]);
    }

    #[test]
    fn test_zero_matches_is_empty() {
        let values = extract(&doc(), "table tr", "textContent").expect("extract");
        assert!(values.is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let err = extract(&doc(), "div[", "textContent").unwrap_err();
        assert!(matches!(err, Error::InvalidSelector { .. }));
    }

    #[test]
    fn test_blank_selector() {
        let err = extract(&doc(), "   ", "textContent").unwrap_err();
        assert!(matches!(err, Error::EmptySelector));
    }

    #[test]
    fn test_idempotent() {
        let doc = doc();
        let first = extract(&doc, "a[href]", "href").expect("first");
        let second = extract(&doc, "a[href]", "href").expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_base_href_overrides_page_url() {
        let doc = Document::parse(
            r#"<html><head><base href="https://cdn.example.net/assets/"></head>
               <body><img src="a.png"></body></html>"#,
            "https://example.com/page",
        );
        let values = extract(&doc, "img", "src").expect("extract");
        assert_eq!(values.as_slice(), ["https://cdn.example.net/assets/a.png"]);
    }

    #[test]
    fn test_unparseable_page_url_keeps_relative() {
        let doc = Document::parse(r#"<a href="/about">About</a>"#, "not a url");
        assert!(doc.base().is_none());
        let values = extract(&doc, "a", "href").expect("extract");
        assert_eq!(values.as_slice(), ["/about"]);
    }

    #[test]
    fn test_element_failure_is_isolated() {
        let doc = doc();
        let sel = compile_selector(".card").expect("selector");
        let values = collect_values(doc.html().select(&sel), |el| {
            if el.value().attr("data-id") == Some("7") {
                Err(Error::transport("simulated"))
            } else {
                Ok(el.text().collect())
            }
        });
        assert_eq!(values.as_slice(), ["Two"]);
    }

    #[test]
    fn test_diagnostics() {
        let report = doc().diagnostics();
        assert_eq!(report.url, "https://example.com/page");
        assert_eq!(report.heading_matches, 4);
        assert!(report.total_elements > 10);
    }

    mod properties {
        use super::*;

        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_values_are_trimmed_and_non_empty(
                texts in proptest::collection::vec("[a-zA-Z0-9 ]{0,20}", 0..12)
            ) {
                let html: String = texts.iter().map(|t| format!("<p>{t}</p>")).collect();
                let doc = Document::parse(&html, "https://example.com/");

                let first = extract(&doc, "p", "textContent").expect("extract");
                let expected: Vec<String> = texts
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                prop_assert_eq!(first.as_slice(), expected.as_slice());

                let second = extract(&doc, "p", "textContent").expect("extract");
                prop_assert_eq!(first, second);
            }
        }
    }
}
