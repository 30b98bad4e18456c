//! View classification - which page of the CRM is being looked at

use crate::RecordType;
use std::fmt;

/// Classification of the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Contact list or contact detail page
    Contacts,
    /// Deal list, deal detail or pipeline board
    Deals,
    /// Task list
    Tasks,
    /// Anything else
    Unknown,
}

impl View {
    /// Classify a location path
    ///
    /// Rules are checked in fixed order and the first match wins: contacts,
    /// then deals/pipeline, then tasks.
    ///
    /// # Examples
    ///
    /// ```
    /// use crmsync_domain::View;
    ///
    /// assert_eq!(View::classify("/app/contacts/123"), View::Contacts);
    /// assert_eq!(View::classify("/app/deals/pipeline/5"), View::Deals);
    /// assert_eq!(View::classify("/app/settings"), View::Unknown);
    /// ```
    pub fn classify(path: &str) -> Self {
        // "/contact" also covers "/contacts"; likewise for deal and task
        if path.contains("/contact") {
            View::Contacts
        } else if path.contains("/deal") || path.contains("/pipeline") {
            View::Deals
        } else if path.contains("/task") {
            View::Tasks
        } else {
            View::Unknown
        }
    }

    /// Record types extracted for this view; unknown views extract everything
    pub fn record_types(&self) -> &'static [RecordType] {
        match self {
            View::Contacts => &[RecordType::Contacts],
            View::Deals => &[RecordType::Deals],
            View::Tasks => &[RecordType::Tasks],
            View::Unknown => &RecordType::ALL,
        }
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Contacts => "contacts",
            View::Deals => "deals",
            View::Tasks => "tasks",
            View::Unknown => "unknown",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
