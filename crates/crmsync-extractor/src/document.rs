//! Document model over parsed HTML
//!
//! The live page is reached through [`PageSource`]; a pass takes one
//! snapshot of its markup and parses it into a [`Document`]. Markup of any
//! shape parses (html5ever recovers from everything), so a page without the
//! expected structure simply yields no candidates.

use crate::error::ExtractorError;
use scraper::{ElementRef, Html, Selector};
use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};

/// Boundary to the page being extracted
pub trait PageSource {
    /// Current location path, e.g. `/app/contacts`
    fn location(&self) -> String;

    /// Resolves once the page reports load-complete
    fn wait_loaded(&self) -> impl Future<Output = ()> + Send;

    /// Current markup of the page
    fn snapshot(&self) -> String;
}

/// A page that is fully loaded from the start, e.g. a saved HTML file
#[derive(Debug, Clone)]
pub struct StaticPage {
    location: String,
    markup: String,
}

impl StaticPage {
    /// Create a page from its location path and markup
    pub fn new(location: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            markup: markup.into(),
        }
    }
}

impl PageSource for StaticPage {
    fn location(&self) -> String {
        self.location.clone()
    }

    async fn wait_loaded(&self) {}

    fn snapshot(&self) -> String {
        self.markup.clone()
    }
}

/// A parsed snapshot of one page
pub struct Document {
    html: Html,
    location: String,
}

impl Document {
    /// Parse markup taken from `location`
    pub fn parse(location: impl Into<String>, markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            location: location.into(),
        }
    }

    /// Location path the snapshot was taken from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> impl Iterator<Item = ElementRef<'a>> + 'b
    where
        'a: 'b,
    {
        self.html.select(selector)
    }

    /// Whitespace-normalised text of the whole document
    pub fn text(&self) -> String {
        normalize_ws(&self.html.root_element().text().collect::<String>())
    }

    /// Hash of the visible text; equal text gives an equal fingerprint
    /// within one build of the extractor
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.text().hash(&mut hasher);
        hasher.finish()
    }
}

/// Compile a built-in selector
pub(crate) fn css(selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|e| ExtractorError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Collapse whitespace runs to one space and trim
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element, whitespace normalised
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

/// Text content of an element, trimmed but with inner whitespace kept
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Descendants of `element` matching `selector`, excluding the element itself
pub fn descendants<'a, 'b>(
    element: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    let own_id = element.id();
    element.select(selector).filter(move |e| e.id() != own_id)
}

/// First descendant of `element` matching `selector`
pub fn first_descendant<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    descendants(element, selector).next()
}

/// Attribute value on the element or its nearest ancestor carrying it
pub fn closest_attr(element: ElementRef<'_>, attr: &str) -> Option<String> {
    if let Some(v) = element.value().attr(attr) {
        return Some(v.to_string());
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find_map(|e| e.value().attr(attr).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  Ann \n\t Lee  "), "Ann Lee");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn test_element_text_joins_cells() {
        let doc = Document::parse(
            "/",
            "<table><tr>\n<td>Ann</td>\n<td>ann@example.com</td>\n</tr></table>",
        );
        let tr = css("tr").unwrap();
        let row = doc.select(&tr).next().unwrap();
        assert_eq!(element_text(row), "Ann ann@example.com");
    }

    #[test]
    fn test_raw_text_keeps_inner_whitespace() {
        let doc = Document::parse("/", "<table><tr> <td>Call</td>      <td>Bo</td> </tr></table>");
        let tr = css("tr").unwrap();
        let row = doc.select(&tr).next().unwrap();
        assert_eq!(raw_text(row), "Call      Bo");
        assert_eq!(element_text(row), "Call Bo");
    }

    #[test]
    fn test_descendants_exclude_self() {
        let doc = Document::parse("/", r#"<div class="card"><div class="card">inner</div></div>"#);
        let card = css(".card").unwrap();
        let outer = doc.select(&card).next().unwrap();
        let inner: Vec<_> = descendants(outer, &card).collect();
        assert_eq!(inner.len(), 1);
        assert_eq!(element_text(inner[0]), "inner");
    }

    #[test]
    fn test_closest_attr_checks_self_then_ancestors() {
        let doc = Document::parse(
            "/",
            r#"<section data-stage-name="Won"><div id="x" data-stage-name="Lost"></div><div id="y"></div></section>"#,
        );
        let x = doc.select(&css("#x").unwrap()).next().unwrap();
        let y = doc.select(&css("#y").unwrap()).next().unwrap();
        assert_eq!(closest_attr(x, "data-stage-name").as_deref(), Some("Lost"));
        assert_eq!(closest_attr(y, "data-stage-name").as_deref(), Some("Won"));
        assert_eq!(closest_attr(y, "data-pipeline-name"), None);
    }

    #[test]
    fn test_garbage_markup_parses() {
        let doc = Document::parse("/", "<<<not html>>> </td></tr>");
        let tr = css("tr").unwrap();
        assert_eq!(doc.select(&tr).count(), 0);
    }

    #[test]
    fn test_fingerprint_tracks_text() {
        let a = Document::parse("/", "<p>Hello   world</p>");
        let b = Document::parse("/", "<div>Hello world</div>");
        let c = Document::parse("/", "<p>Goodbye</p>");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(matches!(css("[[["), Err(ExtractorError::Selector { .. })));
    }
}
