use super::{placeholder_id, RecordResolvers};
use crate::document::css;
use crate::error::ExtractorError;
use crate::patterns::{compile, CURRENCY};
use crate::resolve::{Attribute, Candidate, Chain, ClosestAttr, DescendantText, FieldSet, FnStrategy, TextPattern};
use crmsync_domain::Deal;

/// Resolver chains for deals
pub struct DealFields {
    fields: FieldSet,
}

impl DealFields {
    /// Compile the deal chains
    pub fn new() -> Result<Self, ExtractorError> {
        let fields = FieldSet::new()
            .chain(
                Chain::new("id")
                    .then(Attribute(vec!["data-deal-id", "data-id"]))
                    .then(FnStrategy::new(|c| Ok(Some(placeholder_id("deal", c))))),
            )
            .chain(Chain::new("title").then(DescendantText(css(
                r#"[data-title], .title, [class*="title"], h3, h4, [class*="deal-title"]"#,
            )?)))
            .chain(Chain::new("value").then(TextPattern(compile(CURRENCY)?)))
            .chain(
                Chain::new("pipeline")
                    .then(DescendantText(css(r#"[data-pipeline], [class*="pipeline"]"#)?))
                    .then(ClosestAttr("data-pipeline-name")),
            )
            .chain(
                Chain::new("stage")
                    .then(DescendantText(css(r#"[data-stage], [class*="stage"], [class*="status"]"#)?))
                    .then(ClosestAttr("data-stage-name")),
            )
            .chain(Chain::new("contact").then(DescendantText(css(
                r#"[data-contact], [class*="contact"], [href*="contact"]"#,
            )?)))
            .chain(Chain::new("owner").then(DescendantText(css(
                r#"[data-owner], [class*="owner"], [class*="user"]"#,
            )?)));
        Ok(Self { fields })
    }
}

impl RecordResolvers for DealFields {
    type Output = Deal;

    fn resolve(&self, c: &mut Candidate<'_>) -> Result<Deal, ExtractorError> {
        self.fields.resolve_all(c)?;
        Ok(Deal {
            value: parse_amount(&c.take("value"))?,
            id: c.take("id"),
            title: c.take("title"),
            pipeline: c.take("pipeline"),
            stage: c.take("stage"),
            contact: c.take("contact"),
            owner: c.take("owner"),
        })
    }
}

/// Amount from a currency match such as `$12,500.50`; no match is zero
fn parse_amount(raw: &str) -> Result<f64, ExtractorError> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    let digits: String = raw.chars().filter(|ch| !matches!(ch, '$' | ',')).collect();
    let value = digits
        .parse::<f64>()
        .map_err(|e| ExtractorError::Candidate(format!("unparseable amount '{}': {}", raw, e)))?;
    if !value.is_finite() {
        return Err(ExtractorError::Candidate(format!("amount out of range: {} digits", digits.len())));
    }
    Ok(value)
}
