//! Command implementations.

pub mod delete;
pub mod extract;
pub mod list;
pub mod status;

pub use self::delete::execute_delete;
pub use self::extract::execute_extract;
pub use self::list::execute_list;
pub use self::status::execute_status;

use crate::config::Config;
use crate::error::Result;
use crmsync_store::SqliteStore;
use std::fs;

/// Open the configured store, creating its directory if needed.
pub(crate) fn open_store(config: &Config) -> Result<SqliteStore> {
    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteStore::open(&config.database, &config.store)?)
}
