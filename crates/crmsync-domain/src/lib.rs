//! crmsync Domain Layer
//!
//! Core model for the CRM record extractor. It has ZERO external dependencies
//! and defines the records, the persisted collection, view classification,
//! the merge algorithm and the store boundary that other crates implement.
//!
//! ## Key Concepts
//!
//! - **Record**: a contact, deal or task, unique by id within its type
//! - **Collection**: the persisted records of every type plus the last sync time
//! - **View**: classification of the current page driving what gets extracted
//! - **Merge**: reconciles a freshly extracted batch with the persisted records
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business logic only
//! - Storage lives in `crmsync-store`, extraction in `crmsync-extractor`
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod merge;
pub mod record;
pub mod record_type;
pub mod traits;
pub mod view;

// Re-exports for convenience
pub use collection::{now_millis, Collection, Timestamp};
pub use merge::{merge, merge_into};
pub use record::{Contact, Deal, Record, Task, TaskType};
pub use record_type::RecordType;
pub use view::View;
