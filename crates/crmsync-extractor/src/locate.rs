//! Candidate location
//!
//! Each record type has a list of structural queries tried in order. The
//! first query that yields at least one element wins and later queries are
//! never run. A type may also carry a filter applied to whatever the winning
//! query produced.

use crate::document::{css, descendants, element_text, raw_text, Document};
use crate::error::ExtractorError;
use crate::patterns::{compile, CURRENCY_MARKER, EMAIL};
use crmsync_domain::RecordType;
use scraper::{ElementRef, Selector};
use tracing::debug;

/// Selector for cell-like children
pub const CELLS: &str = r#"td, [role="cell"]"#;

type ElementFilter = Box<dyn Fn(ElementRef<'_>) -> bool + Send + Sync>;

struct Query {
    source: &'static str,
    selector: Selector,
    filter: Option<ElementFilter>,
}

impl Query {
    fn new(source: &'static str) -> Result<Self, ExtractorError> {
        Ok(Self {
            source,
            selector: css(source)?,
            filter: None,
        })
    }

    fn filtered(source: &'static str, filter: ElementFilter) -> Result<Self, ExtractorError> {
        Ok(Self {
            filter: Some(filter),
            ..Self::new(source)?
        })
    }

    fn accepts(&self, element: ElementRef<'_>) -> bool {
        self.filter.as_ref().is_none_or(|f| f(element))
    }
}

/// Finds the elements that likely represent one record of a type
pub struct CandidateLocator {
    record_type: RecordType,
    queries: Vec<Query>,
    keep: Option<ElementFilter>,
}

impl CandidateLocator {
    /// Locator for `record_type`
    pub fn for_type(record_type: RecordType) -> Result<Self, ExtractorError> {
        match record_type {
            RecordType::Contacts => Self::contacts(),
            RecordType::Deals => Self::deals(),
            RecordType::Tasks => Self::tasks(),
        }
    }

    /// Table rows first, then row or contact markers; keeps rows with an
    /// email or more than two populated cells
    pub fn contacts() -> Result<Self, ExtractorError> {
        let email = compile(EMAIL)?;
        let cells = css(CELLS)?;
        Ok(Self {
            record_type: RecordType::Contacts,
            queries: vec![
                Query::new("table tbody tr")?,
                Query::new(r#"[role="row"], .contact-row, [data-contact-id]"#)?,
            ],
            keep: Some(Box::new(move |row: ElementRef<'_>| {
                email.is_match(&element_text(row))
                    || descendants(row, &cells)
                        .filter(|c| !element_text(*c).is_empty())
                        .count()
                        > 2
            })),
        })
    }

    /// Deal card and row marker families, then any card, item or row that
    /// mentions money or a deal keyword
    pub fn deals() -> Result<Self, ExtractorError> {
        let currency = compile(CURRENCY_MARKER)?;
        let mut queries = [
            "[data-deal-id]",
            ".deal-card",
            r#"[class*="deal"][class*="card"]"#,
            r#"[class*="deal"][class*="item"]"#,
            "tr[data-deal]",
            "[data-pipeline-item]",
        ]
        .into_iter()
        .map(Query::new)
        .collect::<Result<Vec<_>, _>>()?;
        queries.push(Query::filtered(
            r#"[class*="card"], [class*="item"], tr"#,
            Box::new(move |el: ElementRef<'_>| {
                let text = element_text(el);
                let lower = text.to_lowercase();
                currency.is_match(&text) || lower.contains("deal") || lower.contains("pipeline")
            }),
        )?);
        Ok(Self {
            record_type: RecordType::Deals,
            queries,
            keep: None,
        })
    }

    /// Broad rows whose text mentions a task keyword and is longer than
    /// ten characters
    pub fn tasks() -> Result<Self, ExtractorError> {
        const KEYWORDS: [&str; 6] = ["call", "email", "meeting", "task", "incomplete", "complete"];
        Ok(Self {
            record_type: RecordType::Tasks,
            queries: vec![Query::new(r#"table tbody tr, [role="row"]"#)?],
            keep: Some(Box::new(|row: ElementRef<'_>| {
                let text = raw_text(row).to_lowercase();
                text.chars().count() > 10 && KEYWORDS.iter().any(|k| text.contains(k))
            })),
        })
    }

    /// Record type this locator serves
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Lazily yield candidates from `doc`, in document order
    pub fn locate<'a>(&'a self, doc: &'a Document) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a> {
        for query in &self.queries {
            let mut hits = doc.select(&query.selector).filter(move |e| query.accepts(*e)).peekable();
            if hits.peek().is_some() {
                debug!(record_type = %self.record_type, query = query.source, "candidate query matched");
                let keep = &self.keep;
                return Box::new(hits.filter(move |e| keep.as_ref().is_none_or(|f| f(*e))));
            }
        }
        debug!(record_type = %self.record_type, "no candidate query matched");
        Box::new(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(locator: &CandidateLocator, markup: &str) -> Vec<String> {
        let doc = Document::parse("/", markup);
        locator.locate(&doc).map(element_text).collect()
    }

    #[test]
    fn test_contacts_skip_header_and_spacer_rows() {
        let locator = CandidateLocator::contacts().unwrap();
        let rows = located(
            &locator,
            "<table><tbody>\
             <tr><td></td><td></td><td></td></tr>\
             <tr><td>Ann</td> <td>ann@example.com</td></tr>\
             <tr><td>Bob</td> <td>555-123-4567</td> <td>Sales</td></tr>\
             <tr><td>Spacer</td></tr>\
             </tbody></table>",
        );
        assert_eq!(rows, vec!["Ann ann@example.com", "Bob 555-123-4567 Sales"]);
    }

    #[test]
    fn test_contacts_marker_fallback_only_without_table_rows() {
        let locator = CandidateLocator::contacts().unwrap();
        let rows = located(
            &locator,
            r#"<div data-contact-id="7">Cy cy@example.com</div>"#,
        );
        assert_eq!(rows, vec!["Cy cy@example.com"]);
    }

    #[test]
    fn test_deals_first_family_wins() {
        let locator = CandidateLocator::deals().unwrap();
        let rows = located(
            &locator,
            r#"<div data-deal-id="1">A $10</div><div class="deal-card">B $20</div>"#,
        );
        assert_eq!(rows, vec!["A $10"]);
    }

    #[test]
    fn test_deals_currency_fallback() {
        let locator = CandidateLocator::deals().unwrap();
        let rows = located(
            &locator,
            r#"<div class="card">Renewal $5,000</div><div class="card">Nothing here</div><div class="item">Pipeline review</div>"#,
        );
        assert_eq!(rows, vec!["Renewal $5,000", "Pipeline review"]);
    }

    #[test]
    fn test_tasks_keyword_and_length_filter() {
        let locator = CandidateLocator::tasks().unwrap();
        let rows = located(
            &locator,
            "<table><tbody>\
             <tr><td>Call</td></tr>\
             <tr><td>x</td> <td>Call Ann about renewal</td></tr>\
             <tr><td>Lunch with the whole team</td></tr>\
             </tbody></table>",
        );
        assert_eq!(rows, vec!["x Call Ann about renewal"]);
    }

    #[test]
    fn test_tasks_length_counts_raw_whitespace() {
        let locator = CandidateLocator::tasks().unwrap();
        let rows = located(
            &locator,
            "<table><tbody><tr><td>Call</td>      <td>Bo</td></tr></tbody></table>",
        );
        assert_eq!(rows, vec!["Call Bo"]);
    }

    #[test]
    fn test_unstructured_document_yields_nothing() {
        for rt in RecordType::ALL {
            let locator = CandidateLocator::for_type(rt).unwrap();
            assert!(located(&locator, "<p>just prose</p>").is_empty());
            assert!(located(&locator, "").is_empty());
        }
    }
}
