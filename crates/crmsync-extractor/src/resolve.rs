//! Resolver chains
//!
//! A field is resolved by an ordered list of [`Strategy`] values. The
//! [`Chain`] runner tries them in order and keeps the first non-empty,
//! trimmed result; if none produces one the field is the empty string.
//! Chains of one record type are grouped in a [`FieldSet`] and run in
//! declaration order, so a later chain may read a field resolved earlier.

use crate::document::{closest_attr, descendants, element_text, first_descendant};
use crate::error::ExtractorError;
use crate::patterns::first_match;
use crmsync_domain::Timestamp;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;

/// One candidate element plus what has been resolved from it so far
pub struct Candidate<'a> {
    /// The candidate element
    pub element: ElementRef<'a>,

    /// Position among the candidates of its type in this pass
    pub index: usize,

    /// Wall-clock millis at which the pass started
    pub pass_millis: Timestamp,

    /// Cell-like children, in document order
    pub cells: Vec<ElementRef<'a>>,

    /// Normalised text content of the element
    pub text: String,

    resolved: HashMap<&'static str, String>,
}

impl<'a> Candidate<'a> {
    /// Wrap `element`, collecting its cells with `cell_selector`
    pub fn new(element: ElementRef<'a>, index: usize, pass_millis: Timestamp, cell_selector: &Selector) -> Self {
        Self {
            element,
            index,
            pass_millis,
            cells: descendants(element, cell_selector).collect(),
            text: element_text(element),
            resolved: HashMap::new(),
        }
    }

    /// A field resolved earlier in the same set, or `""`
    pub fn field(&self, name: &str) -> &str {
        self.resolved.get(name).map(String::as_str).unwrap_or("")
    }

    /// Remove a resolved field, leaving `""` in its place
    pub fn take(&mut self, name: &str) -> String {
        self.resolved.remove(name).unwrap_or_default()
    }

    /// Texts of the cell-like children
    pub fn cell_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|c| element_text(*c))
    }
}

/// One way of resolving a field from a candidate
///
/// `Ok(None)` (or an empty string) hands over to the next strategy.
/// `Err` aborts the candidate.
pub trait Strategy: Send + Sync {
    /// Attempt to resolve a value
    fn resolve(&self, candidate: &Candidate<'_>) -> Result<Option<String>, ExtractorError>;
}

/// Ordered fallback chain for one field
pub struct Chain {
    field: &'static str,
    strategies: Vec<Box<dyn Strategy>>,
}

impl Chain {
    /// Empty chain for `field`
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy
    pub fn then(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Field this chain resolves
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Run the strategies in order; first non-empty value wins
    pub fn resolve(&self, candidate: &Candidate<'_>) -> Result<String, ExtractorError> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.resolve(candidate)? {
                let value = value.trim();
                if !value.is_empty() {
                    return Ok(value.to_string());
                }
            }
        }
        Ok(String::new())
    }
}

/// Chains of one record type, run in order
#[derive(Default)]
pub struct FieldSet {
    chains: Vec<Chain>,
}

impl FieldSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain
    pub fn chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    /// Resolve every chain into the candidate
    pub fn resolve_all(&self, candidate: &mut Candidate<'_>) -> Result<(), ExtractorError> {
        for chain in &self.chains {
            let value = chain.resolve(candidate)?;
            candidate.resolved.insert(chain.field, value);
        }
        Ok(())
    }
}

/// First present, non-empty attribute of the candidate element
pub struct Attribute(pub Vec<&'static str>);

impl Strategy for Attribute {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        let attrs = c.element.value();
        Ok(self
            .0
            .iter()
            .filter_map(|name| attrs.attr(name))
            .find(|v| !v.trim().is_empty())
            .map(str::to_string))
    }
}

/// Text of the first descendant matching a selector
pub struct DescendantText(pub Selector);

impl Strategy for DescendantText {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(first_descendant(c.element, &self.0).map(element_text))
    }
}

/// Attribute of the first descendant matching a selector, with a prefix removed
pub struct DescendantAttr {
    /// Descendant selector
    pub selector: Selector,
    /// Attribute to read
    pub attr: &'static str,
    /// Prefix stripped from the value, e.g. `mailto:`
    pub strip_prefix: &'static str,
}

impl Strategy for DescendantAttr {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(first_descendant(c.element, &self.selector)
            .and_then(|e| e.value().attr(self.attr))
            .map(|v| v.strip_prefix(self.strip_prefix).unwrap_or(v).to_string()))
    }
}

/// Attribute on the candidate or its nearest ancestor carrying it
pub struct ClosestAttr(pub &'static str);

impl Strategy for ClosestAttr {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(closest_attr(c.element, self.0))
    }
}

/// First match of a pattern anywhere in the candidate text
pub struct TextPattern(pub Regex);

impl Strategy for TextPattern {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(self.0.find(&c.text).map(|m| m.as_str().to_string()))
    }
}

/// First match of a pattern battery against the candidate text
pub struct TextBattery(pub Vec<Regex>);

impl Strategy for TextBattery {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(first_match(&self.0, &c.text).map(str::to_string))
    }
}

/// First cell matching a pattern battery
pub struct CellBattery {
    /// Patterns in priority order
    pub battery: Vec<Regex>,
    /// Yield the whole cell text instead of the match
    pub whole_cell: bool,
}

impl Strategy for CellBattery {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(c.cell_texts().find_map(|text| {
            let hit = first_match(&self.battery, &text)?;
            Some(if self.whole_cell { text.clone() } else { hit.to_string() })
        }))
    }
}

/// Text of the cell at a fixed position
pub struct CellAt(pub usize);

impl Strategy for CellAt {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(c.cells.get(self.0).map(|e| element_text(*e)))
    }
}

/// Text of the last cell when shorter than a bound
pub struct LastCell {
    /// Exclusive upper bound on the text length in characters
    pub max_len: usize,
}

impl Strategy for LastCell {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(c.cells
            .last()
            .map(|e| element_text(*e))
            .filter(|t| t.chars().count() < self.max_len))
    }
}

/// First of the leading cells whose text satisfies a predicate
pub struct FirstCell<F> {
    /// How many leading cells to inspect; `None` inspects all
    pub limit: Option<usize>,
    /// Acceptance test over the cell text and the candidate
    pub accept: F,
}

impl<F> FirstCell<F>
where
    F: Fn(&str, &Candidate<'_>) -> bool + Send + Sync,
{
    /// Inspect up to `limit` leading cells
    pub fn new(limit: Option<usize>, accept: F) -> Self {
        Self { limit, accept }
    }
}

impl<F> Strategy for FirstCell<F>
where
    F: Fn(&str, &Candidate<'_>) -> bool + Send + Sync,
{
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        let limit = self.limit.unwrap_or(usize::MAX);
        Ok(c.cell_texts().take(limit).find(|t| (self.accept)(t, c)))
    }
}

/// Value of a field resolved earlier in the same set
pub struct Field(pub &'static str);

impl Strategy for Field {
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        Ok(Some(c.field(self.0).to_string()))
    }
}

/// Strategy backed by a closure
pub struct FnStrategy<F>(pub F);

impl<F> FnStrategy<F>
where
    F: Fn(&Candidate<'_>) -> Result<Option<String>, ExtractorError> + Send + Sync,
{
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Strategy for FnStrategy<F>
where
    F: Fn(&Candidate<'_>) -> Result<Option<String>, ExtractorError> + Send + Sync,
{
    fn resolve(&self, c: &Candidate<'_>) -> Result<Option<String>, ExtractorError> {
        (self.0)(c)
    }
}

/// Non-empty trimmed texts of every descendant matching a selector, in order
pub fn all_texts(element: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    descendants(element, selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}
