//! Record type tags used to key collections and store tables

use std::fmt;
use std::str::FromStr;

/// The three record families the extractor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordType {
    /// People and companies
    Contacts,
    /// Opportunities with a monetary value
    Deals,
    /// Calls, emails, meetings and other follow-ups
    Tasks,
}

impl RecordType {
    /// Every record type, in extraction order
    pub const ALL: [RecordType; 3] = [RecordType::Contacts, RecordType::Deals, RecordType::Tasks];

    /// Stable lowercase name, also used as the collection key
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Contacts => "contacts",
            RecordType::Deals => "deals",
            RecordType::Tasks => "tasks",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contacts" | "contact" => Ok(RecordType::Contacts),
            "deals" | "deal" => Ok(RecordType::Deals),
            "tasks" | "task" => Ok(RecordType::Tasks),
            other => Err(format!("Unknown record type: {}", other)),
        }
    }
}
