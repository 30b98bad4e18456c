//! Result and summary types for an extraction pass

use crmsync_domain::{Collection, RecordType, Timestamp, View};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Per-type record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    /// Contacts
    pub contacts: usize,

    /// Deals
    pub deals: usize,

    /// Tasks
    pub tasks: usize,
}

impl TypeCounts {
    /// Count for one type
    pub fn get(&self, record_type: RecordType) -> usize {
        match record_type {
            RecordType::Contacts => self.contacts,
            RecordType::Deals => self.deals,
            RecordType::Tasks => self.tasks,
        }
    }

    /// Set the count for one type
    pub fn set(&mut self, record_type: RecordType, count: usize) {
        match record_type {
            RecordType::Contacts => self.contacts = count,
            RecordType::Deals => self.deals = count,
            RecordType::Tasks => self.tasks = count,
        }
    }

    /// Sum over all types
    pub fn total(&self) -> usize {
        self.contacts + self.deals + self.tasks
    }

    /// Counts of everything held by a collection
    pub fn of(collection: &Collection) -> Self {
        let mut counts = Self::default();
        for rt in RecordType::ALL {
            counts.set(rt, collection.len(rt));
        }
        counts
    }
}

/// What one pass did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSummary {
    /// Classified view
    #[serde(serialize_with = "serialize_view")]
    pub view: View,

    /// Records accepted from the page, per type
    pub extracted: TypeCounts,

    /// Records held by the store after the pass, per type
    pub stored: TypeCounts,

    /// Candidates that failed the completeness gates
    pub rejected: TypeCounts,

    /// Candidates dropped because resolution failed
    pub failed: TypeCounts,

    /// Last sync time after the pass, if any merge ever happened
    pub last_sync: Option<Timestamp>,

    /// A next-page control was present
    pub next_page_available: bool,

    /// Fingerprint of the page text
    pub fingerprint: u64,

    /// Human-readable outcome
    pub message: String,
}

fn serialize_view<S: Serializer>(view: &View, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(view.as_str())
}

impl ExtractionSummary {
    /// `Extracted: N contacts, M deals, K tasks`, or a notice when nothing was found
    pub fn message_for(extracted: &TypeCounts) -> String {
        if extracted.total() == 0 {
            "No data found on this page".to_string()
        } else {
            format!(
                "Extracted: {} contacts, {} deals, {} tasks",
                extracted.contacts, extracted.deals, extracted.tasks
            )
        }
    }
}

/// Outcome of `extract()`
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// The pass completed; `counts` are the stored totals per type
    Success {
        /// Stored records per type
        counts: TypeCounts,
        /// Details of the pass
        summary: ExtractionSummary,
    },

    /// The store failed; nothing from this pass was written
    Failure {
        /// Error description
        error: String,
    },
}

impl ExtractionResult {
    /// True for [`ExtractionResult::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }

    /// Stored counts of a successful pass
    pub fn counts(&self) -> Option<&TypeCounts> {
        match self {
            ExtractionResult::Success { counts, .. } => Some(counts),
            ExtractionResult::Failure { .. } => None,
        }
    }

    /// Summary of a successful pass
    pub fn summary(&self) -> Option<&ExtractionSummary> {
        match self {
            ExtractionResult::Success { summary, .. } => Some(summary),
            ExtractionResult::Failure { .. } => None,
        }
    }
}

// {"success": true, "counts": {...}, "summary": {...}} | {"success": false, "error": "..."}
impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionResult::Success { counts, summary } => {
                let mut s = serializer.serialize_struct("ExtractionResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("counts", counts)?;
                s.serialize_field("summary", summary)?;
                s.end()
            }
            ExtractionResult::Failure { error } => {
                let mut s = serializer.serialize_struct("ExtractionResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// Lifecycle of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassState {
    /// Created, not started
    Idle,
    /// Waiting for the page or extracting
    Extracting,
    /// Finished; results merged
    Done,
    /// Aborted by a store failure
    Failed,
}
