//! List command implementation.

use super::open_store;
use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{Formatter, Printable};
use crmsync_domain::traits::CollectionStore;
use crmsync_domain::RecordType;

/// Execute the list command.
pub async fn execute_list(args: ListArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let record_type: RecordType = args.record_type.into();
    let collection = store.get(record_type)?;
    let needle = args.search.as_deref();

    let output = match record_type {
        RecordType::Contacts => formatter.format_records(&filter(collection.contacts, needle))?,
        RecordType::Deals => formatter.format_records(&filter(collection.deals, needle))?,
        RecordType::Tasks => formatter.format_records(&filter(collection.tasks, needle))?,
    };
    println!("{}", output);
    Ok(())
}

/// Keep records with any field containing `needle`, ignoring case.
pub fn filter<R: Printable>(records: Vec<R>, needle: Option<&str>) -> Vec<R> {
    let needle = match needle.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return records,
    };
    records
        .into_iter()
        .filter(|r| r.cells().iter().any(|cell| cell.to_lowercase().contains(&needle)))
        .collect()
}
