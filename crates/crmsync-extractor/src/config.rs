//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Fixed wait after the page reports load-complete, so late
    /// client-side rendering can land (milliseconds)
    pub settle_delay_ms: u64,

    /// Upper bound on waiting for load-complete (milliseconds)
    ///
    /// When it elapses the pass continues with whatever is rendered.
    pub load_timeout_ms: u64,

    /// Extract every record type when the view cannot be classified
    pub extract_all_on_unknown: bool,
}

impl ExtractorConfig {
    /// Settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Load timeout as a Duration
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.load_timeout_ms == 0 {
            return Err("load_timeout_ms must be greater than 0".to_string());
        }
        if self.settle_delay_ms > self.load_timeout_ms {
            return Err("settle_delay_ms cannot exceed load_timeout_ms".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1_000,
            load_timeout_ms: 30_000,
            extract_all_on_unknown: true,
        }
    }
}

impl ExtractorConfig {
    /// Fast preset: no settle delay, short load timeout
    ///
    /// Suited to static snapshots where nothing renders after load.
    pub fn fast() -> Self {
        Self {
            settle_delay_ms: 0,
            load_timeout_ms: 1_000,
            extract_all_on_unknown: true,
        }
    }

    /// Patient preset: longer settle delay for slow single-page apps
    pub fn patient() -> Self {
        Self {
            settle_delay_ms: 3_000,
            load_timeout_ms: 60_000,
            extract_all_on_unknown: true,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
