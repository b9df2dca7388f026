//! Extraction request and result types.

// ============================================================================
// Imports
// ============================================================================

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::{Attribute, NamedAttribute};

// ============================================================================
// ExtractionRequest
// ============================================================================

/// A `(selector, attribute)` pair ready for delivery.
///
/// Construction only rejects a blank selector. Syntax is checked by the
/// selector engine of the tab that runs the query, which for a live tab is
/// the page's own `querySelectorAll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRequest {
    selector: String,
    attribute: Attribute,
}

impl ExtractionRequest {
    /// Creates a request with a trimmed selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelector`] if the selector is blank.
    pub fn new(selector: &str, attribute: impl Into<Attribute>) -> Result<Self> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(Error::EmptySelector);
        }
        Ok(Self {
            selector: selector.to_string(),
            attribute: attribute.into(),
        })
    }

    /// Returns the trimmed selector.
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the requested attribute.
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }
}

impl From<Preset> for ExtractionRequest {
    fn from(preset: Preset) -> Self {
        Self {
            selector: preset.selector().to_string(),
            attribute: preset.attribute().into(),
        }
    }
}

// ============================================================================
// ExtractionResult
// ============================================================================

/// Ordered, owned, non-empty values in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult(Vec<String>);

impl ExtractionResult {
    /// Returns the values as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the result, returning the values.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for ExtractionResult {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for ExtractionResult {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl FromIterator<String> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ExtractionResult {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Preset
// ============================================================================

/// One-click selector/attribute combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// All heading levels, as text.
    Headings,
    /// Every link target.
    Links,
    /// Every image source.
    Images,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Headings, Self::Links, Self::Images];

    /// Returns the preset's selector.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Headings => "h1, h2, h3, h4, h5, h6",
            Self::Links => "a[href]",
            Self::Images => "img",
        }
    }

    /// Returns the preset's attribute.
    #[must_use]
    pub const fn attribute(self) -> NamedAttribute {
        match self {
            Self::Headings => NamedAttribute::TextContent,
            Self::Links => NamedAttribute::Href,
            Self::Images => NamedAttribute::Src,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_selector() {
        let request = ExtractionRequest::new("  a[href] ", "href").expect("valid");
        assert_eq!(request.selector(), "a[href]");
        assert_eq!(request.attribute(), &Attribute::Named(NamedAttribute::Href));
    }

    #[test]
    fn test_request_rejects_blank() {
        let err = ExtractionRequest::new(" \t", "textContent").unwrap_err();
        assert!(matches!(err, Error::EmptySelector));
    }

    #[test]
    fn test_request_accepts_browser_only_selectors() {
        for selector in ["input:checked", "a:hover", "input:disabled", "a::before"] {
            let request = ExtractionRequest::new(selector, "textContent").expect("deliverable");
            assert_eq!(request.selector(), selector);
        }
    }

    #[test]
    fn test_request_leaves_syntax_to_the_tab() {
        assert!(ExtractionRequest::new("a[href", "href").is_ok());
    }

    #[test]
    fn test_request_arbitrary_attribute() {
        let request = ExtractionRequest::new("div", "data-sku").expect("valid");
        assert_eq!(request.attribute().as_str(), "data-sku");
    }

    #[test]
    fn test_presets_are_valid_requests() {
        for preset in Preset::ALL {
            let request = ExtractionRequest::from(preset);
            assert!(ExtractionRequest::new(request.selector(), request.attribute().clone()).is_ok());
        }
    }

    #[test]
    fn test_preset_values() {
        assert_eq!(Preset::Headings.selector(), "h1, h2, h3, h4, h5, h6");
        assert_eq!(Preset::Headings.attribute(), NamedAttribute::TextContent);
        assert_eq!(Preset::Links.selector(), "a[href]");
        assert_eq!(Preset::Links.attribute(), NamedAttribute::Href);
        assert_eq!(Preset::Images.selector(), "img");
        assert_eq!(Preset::Images.attribute(), NamedAttribute::Src);
    }

    #[test]
    fn test_result_is_json_array() {
        let result = ExtractionResult::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&result).expect("serialize"), r#"["a","b"]"#);
        assert_eq!(result.len(), 2);
    }
}
