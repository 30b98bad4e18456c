//! Store configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`SqliteStore`](crate::SqliteStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How long a transaction waits for another writer before giving up
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    /// Busy timeout as a Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
        }
    }
}
