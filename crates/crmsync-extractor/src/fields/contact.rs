use super::{placeholder_id, RecordResolvers};
use crate::document::css;
use crate::error::ExtractorError;
use crate::patterns::{compile, compile_all, EMAIL, NUMERIC, PHONE_BATTERY};
use crate::resolve::{
    all_texts, Attribute, Candidate, CellBattery, Chain, DescendantAttr, DescendantText, FieldSet, FirstCell,
    FnStrategy, LastCell, TextBattery, TextPattern,
};
use crmsync_domain::Contact;
use scraper::Selector;

const TAGS: &str = r#".badge, .tag, [class*="tag"], .label, [class*="badge"]"#;

/// Resolver chains for contacts
pub struct ContactFields {
    fields: FieldSet,
    tags: Selector,
}

impl ContactFields {
    /// Compile the contact chains
    pub fn new() -> Result<Self, ExtractorError> {
        let email = compile(EMAIL)?;
        let numeric = compile(NUMERIC)?;
        let email_shaped = email.clone();
        let phones = compile_all(&PHONE_BATTERY)?;

        let fields = FieldSet::new()
            .chain(
                Chain::new("id")
                    .then(Attribute(vec!["data-contact-id", "data-id", "id"]))
                    .then(FnStrategy::new(|c| Ok(Some(placeholder_id("contact", c))))),
            )
            .chain(
                Chain::new("name")
                    .then(DescendantText(css(r#"a[href*="/contact/"]"#)?))
                    .then(FirstCell::new(Some(3), move |text, _| {
                        !text.is_empty()
                            && !email_shaped.is_match(text)
                            && !numeric.is_match(text)
                            && text.chars().count() > 1
                    })),
            )
            .chain(
                Chain::new("email")
                    .then(DescendantAttr {
                        selector: css(r#"a[href^="mailto:"]"#)?,
                        attr: "href",
                        strip_prefix: "mailto:",
                    })
                    .then(TextPattern(email)),
            )
            .chain(
                Chain::new("phone")
                    .then(DescendantText(css(r#"a[href^="tel:"]"#)?))
                    .then(CellBattery {
                        battery: phones.clone(),
                        whole_cell: false,
                    })
                    .then(TextBattery(phones)),
            )
            .chain(
                Chain::new("owner")
                    .then(DescendantText(css(
                        r#"[class*="owner"], [class*="user"], .avatar + span, [title*="owner"]"#,
                    )?))
                    .then(LastCell { max_len: 50 }),
            );

        Ok(Self {
            fields,
            tags: css(TAGS)?,
        })
    }
}

impl RecordResolvers for ContactFields {
    type Output = Contact;

    fn resolve(&self, c: &mut Candidate<'_>) -> Result<Contact, ExtractorError> {
        self.fields.resolve_all(c)?;
        Ok(Contact {
            id: c.take("id"),
            name: c.take("name"),
            email: c.take("email"),
            phone: c.take("phone"),
            tags: all_texts(c.element, &self.tags),
            owner: c.take("owner"),
        })
    }
}
