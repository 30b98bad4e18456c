//! crmsync Gatekeeper
//!
//! Decides whether an assembled candidate is complete enough to be stored.
//!
//! The Gatekeeper provides:
//! - Minimal-completeness rules per record type
//! - Within-batch task deduplication on (title, type)
//!
//! Rejection is not an error: rejected candidates are simply not stored.
//!
//! # Examples
//!
//! ```
//! use crmsync_domain::Deal;
//! use crmsync_gatekeeper::{Gatekeeper, ValidationStatus};
//!
//! let gatekeeper = Gatekeeper::default_config();
//! let deal = Deal { id: "d1".into(), title: "Renewal".into(), value: 0.0, ..Default::default() };
//!
//! let result = gatekeeper.validate_deal(&deal);
//! assert_eq!(result.status, ValidationStatus::Rejected);
//! ```

#![warn(missing_docs)]

mod config;
mod dedup;
mod error;
mod validator;

pub use config::{ValidationConfig, MIN_TASK_TITLE_LEN};
pub use dedup::BatchDeduper;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
