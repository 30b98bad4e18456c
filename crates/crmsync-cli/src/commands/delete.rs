//! Delete command implementation.

use super::open_store;
use crate::cli::DeleteArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crmsync_domain::traits::CollectionStore;
use crmsync_domain::RecordType;
use std::io::{self, Write};

/// Execute the delete command.
pub async fn execute_delete(args: DeleteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let record_type: RecordType = args.record_type.into();

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!("About to delete {} {}:", args.ids.len(), record_type);
        for id in &args.ids {
            println!("  - {}", id);
        }
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let mut store = open_store(config)?;
    let missing = delete_ids(&mut store, record_type, &args.ids)?;

    println!(
        "{}",
        formatter.bulk_result("Deleted", args.ids.len() - missing.len(), record_type)
    );
    if !missing.is_empty() {
        println!("{}", formatter.warning(&format!("Not found: {}", missing.join(", "))));
    }
    Ok(())
}

/// Delete each id in its own transaction; returns the ids that did not exist.
pub fn delete_ids<S>(store: &mut S, record_type: RecordType, ids: &[String]) -> std::result::Result<Vec<String>, S::Error>
where
    S: CollectionStore,
{
    let mut missing = Vec::new();
    for id in ids {
        if !store.delete(record_type, id)? {
            missing.push(id.clone());
        }
    }
    Ok(missing)
}
