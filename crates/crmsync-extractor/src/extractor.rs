//! Extraction orchestrator

use crate::assemble::{Batch, RecordAssembler};
use crate::config::ExtractorConfig;
use crate::document::{css, Document, PageSource};
use crate::error::ExtractorError;
use crate::indicator::{PassIndicator, PassReport};
use crate::locate::CandidateLocator;
use crate::types::{ExtractionResult, ExtractionSummary, TypeCounts};
use crmsync_domain::traits::CollectionStore;
use crmsync_domain::{merge_into, now_millis, Collection, Contact, Deal, RecordType, Task, Timestamp, View};
use crmsync_gatekeeper::Gatekeeper;
use scraper::Selector;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

const NEXT_PAGE: &str = r#"[aria-label*="next"], .pagination-next, [class*="next"]"#;

/// Everything taken from one document, before merging
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction {
    /// Classified view
    pub view: View,
    /// Accepted contacts
    pub contacts: Batch<Contact>,
    /// Accepted deals
    pub deals: Batch<Deal>,
    /// Accepted tasks
    pub tasks: Batch<Task>,
    /// A next-page control was present
    pub next_page_available: bool,
    /// Fingerprint of the page text
    pub fingerprint: u64,
}

impl PageExtraction {
    fn counts(&self, f: impl Fn(usize, usize, usize) -> usize) -> TypeCounts {
        TypeCounts {
            contacts: f(self.contacts.len(), self.contacts.rejected, self.contacts.failed),
            deals: f(self.deals.len(), self.deals.rejected, self.deals.failed),
            tasks: f(self.tasks.len(), self.tasks.rejected, self.tasks.failed),
        }
    }

    /// Accepted records per type
    pub fn extracted(&self) -> TypeCounts {
        self.counts(|accepted, _, _| accepted)
    }
}

/// Runs extraction passes against a collection store
pub struct Extractor<S>
where
    S: CollectionStore,
{
    store: Arc<Mutex<S>>,
    contacts: CandidateLocator,
    deals: CandidateLocator,
    tasks: CandidateLocator,
    assembler: RecordAssembler,
    next_page: Selector,
    config: ExtractorConfig,
}

impl<S> Extractor<S>
where
    S: CollectionStore,
    S::Error: std::fmt::Display,
{
    /// Create a new Extractor owning `store`
    pub fn new(store: S, gatekeeper: Gatekeeper, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::with_shared_store(Arc::new(Mutex::new(store)), gatekeeper, config)
    }

    /// Create a new Extractor over a store shared with other callers
    pub fn with_shared_store(
        store: Arc<Mutex<S>>,
        gatekeeper: Gatekeeper,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            store,
            contacts: CandidateLocator::contacts()?,
            deals: CandidateLocator::deals()?,
            tasks: CandidateLocator::tasks()?,
            assembler: RecordAssembler::new(gatekeeper)?,
            next_page: css(NEXT_PAGE)?,
            config,
        })
    }

    /// Shared handle to the store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run one pass over `page`
    pub async fn extract<P: PageSource>(&self, page: &P) -> ExtractionResult {
        self.run_pass(page).await.0
    }

    /// Run one pass over `page`, also returning what its indicator showed
    ///
    /// Waits for load-complete (bounded by the load timeout), lets the page
    /// settle for the configured delay, then classifies, extracts and merges
    /// in one uninterrupted step.
    pub async fn run_pass<P: PageSource>(&self, page: &P) -> (ExtractionResult, PassReport) {
        let location = page.location();
        let mut indicator = PassIndicator::new();
        indicator.start(&location);

        if timeout(self.config.load_timeout(), page.wait_loaded()).await.is_err() {
            warn!(
                location = %location,
                timeout_ms = self.config.load_timeout_ms,
                "Page did not report load-complete in time, extracting anyway"
            );
        }
        let settle = self.config.settle_delay();
        if !settle.is_zero() {
            sleep(settle).await;
        }

        let markup = page.snapshot();
        let pass_millis = now_millis();
        let extraction = {
            let doc = Document::parse(location.as_str(), &markup);
            self.extract_document(&doc, pass_millis)
        };

        match self.persist(&extraction, pass_millis) {
            Ok(snapshot) => {
                let extracted = extraction.extracted();
                let message = ExtractionSummary::message_for(&extracted);
                let stored = TypeCounts::of(&snapshot);
                let summary = ExtractionSummary {
                    view: extraction.view,
                    extracted,
                    stored,
                    rejected: extraction.counts(|_, rejected, _| rejected),
                    failed: extraction.counts(|_, _, failed| failed),
                    last_sync: snapshot.last_sync,
                    next_page_available: extraction.next_page_available,
                    fingerprint: extraction.fingerprint,
                    message: message.clone(),
                };
                let report = indicator.succeed(&message);
                (ExtractionResult::Success { counts: stored, summary }, report)
            }
            Err(e) => {
                let error = e.to_string();
                let report = indicator.fail(&error);
                (ExtractionResult::Failure { error }, report)
            }
        }
    }

    /// Locate, resolve and gate every record type the document's view implies
    pub fn extract_document(&self, doc: &Document, pass_millis: Timestamp) -> PageExtraction {
        let view = View::classify(doc.location());
        let types: &[RecordType] = if view == View::Unknown && !self.config.extract_all_on_unknown {
            &[]
        } else {
            view.record_types()
        };
        debug!(%view, ?types, "View classified");

        let mut extraction = PageExtraction {
            view,
            contacts: Batch::default(),
            deals: Batch::default(),
            tasks: Batch::default(),
            next_page_available: self.next_page_available(doc),
            fingerprint: doc.fingerprint(),
        };
        for &record_type in types {
            match record_type {
                RecordType::Contacts => {
                    extraction.contacts = self.assembler.contacts(self.contacts.locate(doc), pass_millis)
                }
                RecordType::Deals => extraction.deals = self.assembler.deals(self.deals.locate(doc), pass_millis),
                RecordType::Tasks => extraction.tasks = self.assembler.tasks(self.tasks.locate(doc), pass_millis),
            }
        }
        extraction
    }

    /// Remove one stored record; returns whether it existed
    pub fn delete(&self, record_type: RecordType, id: &str) -> Result<bool, ExtractorError> {
        let mut store = self.lock_store()?;
        store
            .delete(record_type, id)
            .map_err(|e| ExtractorError::Store(e.to_string()))
    }

    fn next_page_available(&self, doc: &Document) -> bool {
        doc.select(&self.next_page)
            .next()
            .is_some_and(|el| el.value().attr("disabled").is_none())
    }

    /// Merge each non-empty batch in its own transaction, then read back
    fn persist(&self, extraction: &PageExtraction, now: Timestamp) -> Result<Collection, ExtractorError> {
        let mut store = self.lock_store()?;
        let to_store_error = |e: S::Error| ExtractorError::Store(e.to_string());

        if !extraction.contacts.is_empty() {
            merge_into(&mut *store, extraction.contacts.records.clone(), now).map_err(to_store_error)?;
        }
        if !extraction.deals.is_empty() {
            merge_into(&mut *store, extraction.deals.records.clone(), now).map_err(to_store_error)?;
        }
        if !extraction.tasks.is_empty() {
            merge_into(&mut *store, extraction.tasks.records.clone(), now).map_err(to_store_error)?;
        }

        let snapshot = store.load().map_err(to_store_error)?;
        info!(
            contacts = snapshot.contacts.len(),
            deals = snapshot.deals.len(),
            tasks = snapshot.tasks.len(),
            "Collection updated"
        );
        Ok(snapshot)
    }

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, S>, ExtractorError> {
        self.store
            .lock()
            .map_err(|_| ExtractorError::Store("store lock poisoned".to_string()))
    }
}
