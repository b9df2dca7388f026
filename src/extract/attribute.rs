//! Attribute names and their value resolvers.
//!
//! Seven attribute names have dedicated resolvers, looked up through
//! `RESOLVERS` by [`NamedAttribute`] discriminant. Every other name goes
//! through the generic attribute lookup.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::Result;

use super::resolve::{LinkKind, absolutize};

// ============================================================================
// Types
// ============================================================================

/// Computes the raw (untrimmed) value of one element.
pub(crate) type Resolver = fn(ElementRef<'_>, &ResolveContext<'_>) -> Result<String>;

/// Per-document inputs shared by all resolvers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolveContext<'a> {
    /// Base location for URL resolution.
    pub base: Option<&'a Url>,
    /// Attribute name as requested.
    pub name: &'a str,
}

// ============================================================================
// NamedAttribute
// ============================================================================

/// The closed set of attributes offered by the popup's attribute picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedAttribute {
    /// Element text content.
    TextContent,
    /// Serialized inner markup.
    InnerHtml,
    /// Link target, made absolute.
    Href,
    /// Resource source, made absolute.
    Src,
    /// Alternative text.
    Alt,
    /// Advisory title.
    Title,
    /// Class list as a single string.
    ClassName,
}

impl NamedAttribute {
    /// All named attributes, in picker order.
    pub const ALL: [Self; 7] = [
        Self::TextContent,
        Self::InnerHtml,
        Self::Href,
        Self::Src,
        Self::Alt,
        Self::Title,
        Self::ClassName,
    ];

    /// Returns the DOM property name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextContent => "textContent",
            Self::InnerHtml => "innerHTML",
            Self::Href => "href",
            Self::Src => "src",
            Self::Alt => "alt",
            Self::Title => "title",
            Self::ClassName => "className",
        }
    }

    /// Looks up a named attribute by its exact DOM property name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.as_str() == name)
    }

    #[inline]
    pub(crate) fn resolver(self) -> Resolver {
        RESOLVERS[self as usize]
    }
}

/// Resolver table, indexed by [`NamedAttribute`] discriminant.
static RESOLVERS: [Resolver; 7] = [
    text_content,
    inner_html,
    href,
    src,
    alt,
    title,
    class_name,
];

// ============================================================================
// Attribute
// ============================================================================

/// Attribute requested for extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attribute {
    /// One of the seven attributes with a dedicated resolver.
    Named(NamedAttribute),
    /// Any other attribute name, read with a plain attribute lookup.
    Other(String),
}

impl Attribute {
    /// Parses an attribute name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        NamedAttribute::from_name(name)
            .map(Self::Named)
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(named) => named.as_str(),
            Self::Other(name) => name,
        }
    }

    /// Computes the raw value for one element.
    pub(crate) fn resolve(&self, element: ElementRef<'_>, base: Option<&Url>) -> Result<String> {
        let resolver = match self {
            Self::Named(named) => named.resolver(),
            Self::Other(_) => generic,
        };
        let ctx = ResolveContext {
            base,
            name: self.as_str(),
        };
        resolver(element, &ctx)
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::Named(NamedAttribute::TextContent)
    }
}

impl From<NamedAttribute> for Attribute {
    fn from(named: NamedAttribute) -> Self {
        Self::Named(named)
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        match NamedAttribute::from_name(&name) {
            Some(named) => Self::Named(named),
            None => Self::Other(name),
        }
    }
}

impl From<Attribute> for String {
    fn from(attr: Attribute) -> Self {
        match attr {
            Attribute::Named(named) => named.as_str().to_string(),
            Attribute::Other(name) => name,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Resolvers
// ============================================================================

/// Tags whose `href` DOM property is the resolved URL.
const HREF_PROPERTY_TAGS: &[&str] = &["a", "area", "link", "base"];

/// Tags whose `src` DOM property is the resolved URL.
const SRC_PROPERTY_TAGS: &[&str] = &[
    "img", "script", "iframe", "frame", "embed", "source", "track", "input", "audio", "video",
];

fn text_content(element: ElementRef<'_>, _ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(element.text().collect::<String>().trim().to_string())
}

fn inner_html(element: ElementRef<'_>, _ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(element.inner_html())
}

fn href(element: ElementRef<'_>, ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(url_value(element, ctx, HREF_PROPERTY_TAGS, LinkKind::Href))
}

fn src(element: ElementRef<'_>, ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(url_value(element, ctx, SRC_PROPERTY_TAGS, LinkKind::Src))
}

fn alt(element: ElementRef<'_>, ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(raw_attr(element, ctx.name).unwrap_or_default())
}

fn title(element: ElementRef<'_>, ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(raw_attr(element, ctx.name).unwrap_or_default())
}

fn class_name(element: ElementRef<'_>, _ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(raw_attr(element, "class").unwrap_or_default())
}

fn generic(element: ElementRef<'_>, ctx: &ResolveContext<'_>) -> Result<String> {
    Ok(raw_attr(element, ctx.name).unwrap_or_default())
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads an attribute, retrying lowercase since HTML attribute names are
/// case-insensitive and the parser stores them lowercased.
fn raw_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    let value = element.value();
    value
        .attr(name)
        .or_else(|| value.attr(&name.to_ascii_lowercase()))
        .map(str::to_string)
}

/// Property value (absolute on tags that expose the property), falling back
/// to the raw attribute, then normalized.
fn url_value(
    element: ElementRef<'_>,
    ctx: &ResolveContext<'_>,
    property_tags: &[&str],
    kind: LinkKind,
) -> String {
    let Some(raw) = raw_attr(element, ctx.name) else {
        return String::new();
    };

    let has_property = property_tags.contains(&element.value().name());
    let value = match (has_property, ctx.base) {
        (true, Some(base)) => base.join(raw.trim()).map(String::from).unwrap_or(raw),
        _ => raw,
    };

    absolutize(&value, ctx.base, kind).unwrap_or_else(|e| {
        warn!(value = %value, error = %e, "URL conversion failed");
        value
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let sel = Selector::parse(selector).expect("valid selector");
        html.select(&sel).next().expect("element present")
    }

    fn base() -> Url {
        Url::parse("https://example.com/page").expect("valid url")
    }

    #[test]
    fn test_from_name_round_trips_all() {
        for named in NamedAttribute::ALL {
            assert_eq!(NamedAttribute::from_name(named.as_str()), Some(named));
        }
        assert_eq!(NamedAttribute::from_name("data-id"), None);
        assert_eq!(NamedAttribute::from_name("classname"), None);
    }

    #[test]
    fn test_resolver_table_matches_discriminants() {
        let html = Html::parse_fragment(r#"<p class="lead" title="t">Hi <b>there</b></p>"#);
        let el = first(&html, "p");
        let ctx = ResolveContext {
            base: None,
            name: "title",
        };

        let text = NamedAttribute::TextContent.resolver()(el, &ctx).expect("text");
        assert_eq!(text, "Hi there");

        let inner = NamedAttribute::InnerHtml.resolver()(el, &ctx).expect("inner");
        assert_eq!(inner, "Hi <b>there</b>");

        let class = NamedAttribute::ClassName.resolver()(el, &ctx).expect("class");
        assert_eq!(class, "lead");

        let title = NamedAttribute::Title.resolver()(el, &ctx).expect("title");
        assert_eq!(title, "t");
    }

    #[test]
    fn test_text_content_trims() {
        let html = Html::parse_fragment("<h1>\n   Title  \n</h1>");
        let value = Attribute::parse("textContent")
            .resolve(first(&html, "h1"), None)
            .expect("text");
        assert_eq!(value, "Title");
    }

    #[test]
    fn test_href_anchor_is_absolute() {
        let html = Html::parse_fragment(r##"<a href="/about">About</a><a href="#top">Top</a>"##);
        let base = base();
        let attr = Attribute::parse("href");

        let about = attr.resolve(first(&html, "a[href='/about']"), Some(&base));
        assert_eq!(about.expect("href"), "https://example.com/about");

        let top = attr.resolve(first(&html, "a[href='#top']"), Some(&base));
        assert_eq!(top.expect("href"), "https://example.com/page#top");
    }

    #[test]
    fn test_href_mailto_unchanged() {
        let html = Html::parse_fragment(r#"<a href="mailto:a@example.com">Mail</a>"#);
        let base = base();
        let value = Attribute::parse("href")
            .resolve(first(&html, "a"), Some(&base))
            .expect("href");
        assert_eq!(value, "mailto:a@example.com");
    }

    #[test]
    fn test_href_on_non_link_keeps_fragment() {
        let html = Html::parse_fragment(r##"<div href="#section">x</div>"##);
        let base = base();
        let value = Attribute::parse("href")
            .resolve(first(&html, "div"), Some(&base))
            .expect("href");
        assert_eq!(value, "#section");
    }

    #[test]
    fn test_href_without_base_keeps_relative() {
        let html = Html::parse_fragment(r#"<a href="/about">About</a>"#);
        let value = Attribute::parse("href")
            .resolve(first(&html, "a"), None)
            .expect("href");
        assert_eq!(value, "/about");
    }

    #[test]
    fn test_src_data_uri_unchanged() {
        let html = Html::parse_fragment(r#"<img src="data:image/gif;base64,R0lG">"#);
        let base = base();
        let value = Attribute::parse("src")
            .resolve(first(&html, "img"), Some(&base))
            .expect("src");
        assert_eq!(value, "data:image/gif;base64,R0lG");
    }

    #[test]
    fn test_src_relative_resolved() {
        let html = Html::parse_fragment(r#"<img src="cat.png">"#);
        let base = base();
        let value = Attribute::parse("src")
            .resolve(first(&html, "img"), Some(&base))
            .expect("src");
        assert_eq!(value, "https://example.com/cat.png");
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let html = Html::parse_fragment("<img>");
        let el = first(&html, "img");
        for name in ["alt", "title", "className", "src", "data-missing"] {
            let value = Attribute::parse(name).resolve(el, None).expect("resolves");
            assert_eq!(value, "", "attribute {name}");
        }
    }

    #[test]
    fn test_generic_attribute_case_insensitive() {
        let html = Html::parse_fragment(r#"<div data-id="42"></div>"#);
        let el = first(&html, "div");
        let value = Attribute::parse("DATA-ID").resolve(el, None).expect("generic");
        assert_eq!(value, "42");
    }

    #[test]
    fn test_attribute_serde_as_string() {
        let named: Attribute = serde_json::from_str("\"href\"").expect("parse");
        assert_eq!(named, Attribute::Named(NamedAttribute::Href));

        let other: Attribute = serde_json::from_str("\"data-id\"").expect("parse");
        assert_eq!(other, Attribute::Other("data-id".to_string()));
        assert_eq!(serde_json::to_string(&other).expect("serialize"), "\"data-id\"");
    }
}
