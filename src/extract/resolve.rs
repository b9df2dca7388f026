//! Absolute-URL normalization for `href` and `src` values.

use url::{ParseError, Url};

// ============================================================================
// LinkKind
// ============================================================================

/// Which URL-bearing attribute a value came from.
///
/// The two kinds differ in which values are passed through unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `href`: `mailto:`, `tel:` and `#fragment` values are kept as-is.
    Href,
    /// `src`: `data:` URIs are kept as-is.
    Src,
}

impl LinkKind {
    /// Returns `true` if `value` must be left untouched.
    #[must_use]
    pub fn passes_through(self, value: &str) -> bool {
        if value.starts_with("http") {
            return true;
        }
        match self {
            Self::Href => {
                value.starts_with("mailto:") || value.starts_with("tel:") || value.starts_with('#')
            }
            Self::Src => value.starts_with("data:"),
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Resolves `value` against `base` unless it passes through.
///
/// Empty values are returned unchanged.
///
/// # Errors
///
/// Returns the parse error when the value cannot be joined, including
/// [`ParseError::RelativeUrlWithoutBase`] when the document has no usable
/// base. Callers keep the original value in that case.
pub fn absolutize(value: &str, base: Option<&Url>, kind: LinkKind) -> Result<String, ParseError> {
    if value.is_empty() || kind.passes_through(value) {
        return Ok(value.to_string());
    }

    let base = base.ok_or(ParseError::RelativeUrlWithoutBase)?;
    base.join(value).map(String::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/page").expect("valid url")
    }

    #[test]
    fn test_root_relative_href() {
        let out = absolutize("/about", Some(&base()), LinkKind::Href).expect("resolves");
        assert_eq!(out, "https://example.com/about");
    }

    #[test]
    fn test_document_relative_src() {
        let base = Url::parse("https://example.com/gallery/index.html").expect("valid url");
        let out = absolutize("img/cat.png", Some(&base), LinkKind::Src).expect("resolves");
        assert_eq!(out, "https://example.com/gallery/img/cat.png");
    }

    #[test]
    fn test_href_pass_through() {
        for value in ["mailto:a@example.com", "tel:+15551234", "#top", "https://x.org/"] {
            let out = absolutize(value, Some(&base()), LinkKind::Href).expect("passes");
            assert_eq!(out, value);
        }
    }

    #[test]
    fn test_src_pass_through() {
        let value = "data:image/png;base64,AAAA";
        let out = absolutize(value, Some(&base()), LinkKind::Src).expect("passes");
        assert_eq!(out, value);
    }

    #[test]
    fn test_fragment_is_resolved_for_src() {
        let out = absolutize("#frag", Some(&base()), LinkKind::Src).expect("resolves");
        assert_eq!(out, "https://example.com/page#frag");
    }

    #[test]
    fn test_missing_base_is_an_error() {
        let err = absolutize("/about", None, LinkKind::Href).unwrap_err();
        assert_eq!(err, ParseError::RelativeUrlWithoutBase);
    }

    #[test]
    fn test_empty_value_unchanged() {
        assert_eq!(absolutize("", None, LinkKind::Href).expect("empty"), "");
    }
}
