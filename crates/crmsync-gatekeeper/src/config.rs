//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Shortest task title any configuration may accept
pub const MIN_TASK_TITLE_LEN: usize = 3;

/// Configuration for validation rules
///
/// The completeness rules themselves are fixed; these thresholds can only
/// make them stricter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Deals must be worth strictly more than this
    pub min_deal_value: f64,

    /// Minimum task title length, in characters
    pub min_task_title_len: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_deal_value: 0.0,
            min_task_title_len: MIN_TASK_TITLE_LEN,
        }
    }
}

impl ValidationConfig {
    /// Create a strict configuration
    pub fn strict() -> Self {
        Self {
            min_deal_value: 1.0,
            min_task_title_len: 5,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if !self.min_deal_value.is_finite() || self.min_deal_value < 0.0 {
            return Err(GatekeeperError::Config(format!(
                "min_deal_value must be a non-negative number, got {}",
                self.min_deal_value
            )));
        }
        if self.min_task_title_len < MIN_TASK_TITLE_LEN {
            return Err(GatekeeperError::Config(format!(
                "min_task_title_len must be at least {}, got {}",
                MIN_TASK_TITLE_LEN, self.min_task_title_len
            )));
        }
        Ok(())
    }
}
