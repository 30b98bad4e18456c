//! crmsync Extractor
//!
//! Heuristic record extraction from CRM pages whose markup is not under our
//! control.
//!
//! # Architecture
//!
//! ```text
//! PageSource → Document → View → CandidateLocator → resolver chains
//!            → RecordAssembler (gates) → merge → CollectionStore
//! ```
//!
//! A pass waits for the page (bounded), takes one snapshot and then runs to
//! completion without further suspension. Each field of each record type is
//! resolved by an ordered [`Chain`] of [`Strategy`] values; the first
//! non-empty result wins. A candidate whose resolution fails is dropped on
//! its own, and a store failure fails the pass without a partial write.
//!
//! # Example Usage
//!
//! ```no_run
//! use crmsync_extractor::{Extractor, ExtractorConfig, StaticPage};
//! use crmsync_gatekeeper::Gatekeeper;
//! use crmsync_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("crm.db")?;
//! let extractor = Extractor::new(store, Gatekeeper::default_config(), ExtractorConfig::fast())?;
//!
//! let page = StaticPage::new("/app/contacts", std::fs::read_to_string("contacts.html")?);
//! let result = extractor.extract(&page).await;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assemble;
mod config;
mod document;
mod error;
mod extractor;
mod fields;
mod indicator;
mod locate;
mod patterns;
mod resolve;
mod types;


pub use assemble::{Batch, RecordAssembler, NOT_AVAILABLE};
pub use config::ExtractorConfig;
pub use document::{Document, PageSource, StaticPage};
pub use error::ExtractorError;
pub use extractor::{Extractor, PageExtraction};
pub use fields::{ContactFields, DealFields, RecordResolvers, TaskFields};
pub use indicator::{IndicatorStatus, PassIndicator, PassReport};
pub use locate::CandidateLocator;
pub use resolve::{Candidate, Chain, FieldSet, Strategy};
pub use types::{ExtractionResult, ExtractionSummary, PassState, TypeCounts};
