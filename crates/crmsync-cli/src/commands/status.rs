//! Status command implementation.

use super::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the status command.
pub async fn execute_status(config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let counts = store.counts()?;
    let last_sync = store.last_sync()?;
    println!("{}", formatter.format_status(&counts, last_sync)?);
    Ok(())
}
