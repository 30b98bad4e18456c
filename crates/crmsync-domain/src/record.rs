//! Record module - the business records extracted from CRM pages

use crate::collection::Collection;
use crate::record_type::RecordType;
use std::fmt;
use std::str::FromStr;

/// Common behaviour of every persisted record family
///
/// A record is identified by its `id` within its own type. The associated
/// accessors let generic code (the merge engine, stores) reach the slice of
/// a [`Collection`] that holds records of this type.
pub trait Record: Clone + fmt::Debug + PartialEq {
    /// Which collection slot this record lives in
    const TYPE: RecordType;

    /// Identifier, unique per record type within a collection
    fn id(&self) -> &str;

    /// Records of this type held by a collection
    fn records(collection: &Collection) -> &[Self];

    /// Mutable access to the records of this type
    fn records_mut(collection: &mut Collection) -> &mut Vec<Self>;
}

/// A person in the CRM
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    /// Identifier taken from the page, or a positional placeholder
    pub id: String,

    /// Display name
    pub name: String,

    /// Primary email address
    pub email: String,

    /// Phone number as shown on the page
    pub phone: String,

    /// Tags in the order they appear
    pub tags: Vec<String>,

    /// Account owner
    pub owner: String,
}

/// An opportunity in a pipeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deal {
    /// Identifier taken from the page, or a positional placeholder
    pub id: String,

    /// Deal title
    pub title: String,

    /// Monetary value, never negative
    pub value: f64,

    /// Pipeline the deal belongs to
    pub pipeline: String,

    /// Current stage within the pipeline
    pub stage: String,

    /// Primary contact name
    pub contact: String,

    /// Deal owner
    pub owner: String,
}

/// Kind of follow-up a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskType {
    /// Phone call
    Call,
    /// Email follow-up
    Email,
    /// Meeting
    Meeting,
    /// Anything else
    #[default]
    Other,
}

impl TaskType {
    /// Classify free text by keyword, checking call, email, meeting in that order
    ///
    /// # Examples
    ///
    /// ```
    /// use crmsync_domain::TaskType;
    ///
    /// assert_eq!(TaskType::from_keywords("Call back re: email"), TaskType::Call);
    /// assert_eq!(TaskType::from_keywords("Quarterly review"), TaskType::Other);
    /// ```
    pub fn from_keywords(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("call") {
            TaskType::Call
        } else if lower.contains("email") {
            TaskType::Email
        } else if lower.contains("meeting") {
            TaskType::Meeting
        } else {
            TaskType::Other
        }
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Call => "call",
            TaskType::Email => "email",
            TaskType::Meeting => "meeting",
            TaskType::Other => "other",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(TaskType::Call),
            "email" => Ok(TaskType::Email),
            "meeting" => Ok(TaskType::Meeting),
            "other" => Ok(TaskType::Other),
            _ => Err(format!("Unknown task type: {}", s)),
        }
    }
}

/// A follow-up item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Task {
    /// Identifier taken from the page, or a placeholder built from title and position
    pub id: String,

    /// Kind of task
    pub task_type: TaskType,

    /// Task title
    pub title: String,

    /// Due date exactly as displayed ("2 hours ago", "Jan 17", "2024-01-17")
    pub due: String,

    /// Person the task is assigned to or related to
    pub assignee: String,

    /// Deal or contact the task is linked to
    pub linked_to: String,
}

impl Record for Contact {
    const TYPE: RecordType = RecordType::Contacts;

    fn id(&self) -> &str {
        &self.id
    }

    fn records(collection: &Collection) -> &[Self] {
        &collection.contacts
    }

    fn records_mut(collection: &mut Collection) -> &mut Vec<Self> {
        &mut collection.contacts
    }
}

impl Record for Deal {
    const TYPE: RecordType = RecordType::Deals;

    fn id(&self) -> &str {
        &self.id
    }

    fn records(collection: &Collection) -> &[Self] {
        &collection.deals
    }

    fn records_mut(collection: &mut Collection) -> &mut Vec<Self> {
        &mut collection.deals
    }
}

impl Record for Task {
    const TYPE: RecordType = RecordType::Tasks;

    fn id(&self) -> &str {
        &self.id
    }

    fn records(collection: &Collection) -> &[Self] {
        &collection.tasks
    }

    fn records_mut(collection: &mut Collection) -> &mut Vec<Self> {
        &mut collection.tasks
    }
}
