//! Field resolvers grouped by record type

mod contact;
mod deal;
mod task;

pub use contact::ContactFields;
pub use deal::DealFields;
pub use task::TaskFields;

use crate::error::ExtractorError;
use crate::resolve::Candidate;
use crmsync_domain::Record;

/// Turns one candidate into an unvalidated record
pub trait RecordResolvers: Send + Sync {
    /// Record produced
    type Output: Record;

    /// Resolve every field of the candidate
    fn resolve(&self, candidate: &mut Candidate<'_>) -> Result<Self::Output, ExtractorError>;
}

/// `<prefix>-<index>-<millis>` for candidates without an identifier attribute
pub(crate) fn placeholder_id(prefix: &str, candidate: &Candidate<'_>) -> String {
    format!("{}-{}-{}", prefix, candidate.index, candidate.pass_millis)
}
