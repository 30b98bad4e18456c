//! Record assembly
//!
//! Resolves every candidate into a record, gates it, and collects the
//! survivors into a batch. A candidate whose resolution fails is logged and
//! dropped; the rest of the batch is unaffected.

use crate::document::css;
use crate::error::ExtractorError;
use crate::fields::{ContactFields, DealFields, RecordResolvers, TaskFields};
use crate::locate::CELLS;
use crate::resolve::Candidate;
use crmsync_domain::{Contact, Deal, Record, Task, Timestamp};
use crmsync_gatekeeper::{BatchDeduper, Gatekeeper, ValidationResult};
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

/// Placeholder shown for a missing contact name or email
pub const NOT_AVAILABLE: &str = "N/A";

/// Validated records of one type from one pass
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<R> {
    /// Accepted records, in candidate order
    pub records: Vec<R>,

    /// Candidates located
    pub candidates: usize,

    /// Candidates that failed the gate
    pub rejected: usize,

    /// Candidates whose resolution failed
    pub failed: usize,
}

impl<R> Default for Batch<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            candidates: 0,
            rejected: 0,
            failed: 0,
        }
    }
}

impl<R> Batch<R> {
    /// Number of accepted records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Combines resolved fields into records and applies the completeness gates
pub struct RecordAssembler {
    gatekeeper: Gatekeeper,
    cells: Selector,
    contacts: ContactFields,
    deals: DealFields,
    tasks: TaskFields,
}

impl RecordAssembler {
    /// Compile every resolver chain
    pub fn new(gatekeeper: Gatekeeper) -> Result<Self, ExtractorError> {
        Ok(Self {
            gatekeeper,
            cells: css(CELLS)?,
            contacts: ContactFields::new()?,
            deals: DealFields::new()?,
            tasks: TaskFields::new()?,
        })
    }

    /// Gatekeeper in use
    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Contacts need a name or an email; gaps are then shown as `N/A`
    pub fn contacts<'a>(&self, elements: impl Iterator<Item = ElementRef<'a>>, pass_millis: Timestamp) -> Batch<Contact> {
        let mut batch = self.assemble(elements, &self.contacts, pass_millis, |c| {
            self.gatekeeper.validate_contact(c)
        });
        for contact in &mut batch.records {
            if contact.name.is_empty() {
                contact.name = NOT_AVAILABLE.to_string();
            }
            if contact.email.is_empty() {
                contact.email = NOT_AVAILABLE.to_string();
            }
        }
        batch
    }

    /// Deals need a title and a positive value
    pub fn deals<'a>(&self, elements: impl Iterator<Item = ElementRef<'a>>, pass_millis: Timestamp) -> Batch<Deal> {
        self.assemble(elements, &self.deals, pass_millis, |d| self.gatekeeper.validate_deal(d))
    }

    /// Tasks need a title and must be unique by (title, type) within the batch
    pub fn tasks<'a>(&self, elements: impl Iterator<Item = ElementRef<'a>>, pass_millis: Timestamp) -> Batch<Task> {
        let mut deduper = BatchDeduper::new();
        self.assemble(elements, &self.tasks, pass_millis, |t| {
            self.gatekeeper.admit_task(t, &mut deduper)
        })
    }

    fn assemble<'a, F, G>(
        &self,
        elements: impl Iterator<Item = ElementRef<'a>>,
        fields: &F,
        pass_millis: Timestamp,
        mut gate: G,
    ) -> Batch<F::Output>
    where
        F: RecordResolvers,
        G: FnMut(&F::Output) -> ValidationResult,
    {
        let record_type = <F::Output as Record>::TYPE;
        let mut batch = Batch::default();

        for (index, element) in elements.enumerate() {
            batch.candidates += 1;
            let mut candidate = Candidate::new(element, index, pass_millis, &self.cells);
            let record = match fields.resolve(&mut candidate) {
                Ok(record) => record,
                Err(e) => {
                    warn!(%record_type, index, error = %e, "Dropping candidate");
                    batch.failed += 1;
                    continue;
                }
            };

            let verdict = gate(&record);
            if verdict.is_accepted() {
                batch.records.push(record);
            } else {
                debug!(%record_type, index, id = record.id(), reasons = ?verdict.reasons, "Candidate rejected");
                batch.rejected += 1;
            }
        }

        debug!(
            %record_type,
            candidates = batch.candidates,
            accepted = batch.records.len(),
            rejected = batch.rejected,
            failed = batch.failed,
            "Batch assembled"
        );
        batch
    }
}
