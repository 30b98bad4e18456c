//! Minimal-completeness rules

use crate::{BatchDeduper, GatekeeperError, ValidationConfig};
use crmsync_domain::{Contact, Deal, Task, TaskType};

/// Result of candidate validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the candidate passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    fn from_reasons(reasons: Vec<RejectionReason>) -> Self {
        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };
        Self { status, reasons }
    }

    /// True when the candidate may be stored
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Candidate accepted
    Accepted,

    /// Candidate rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Contact has neither a name nor an email
    MissingIdentity,

    /// Title is empty
    MissingTitle,

    /// Deal value is not above the configured floor
    ValueTooLow {
        /// Resolved value
        value: f64,
        /// Exclusive lower bound
        min: f64,
    },

    /// Task title shorter than the configured minimum
    TitleTooShort {
        /// Title length in characters
        len: usize,
        /// Required length
        min: usize,
    },

    /// Same (title, type) already seen in this batch
    DuplicateInBatch {
        /// Task title
        title: String,
        /// Task type
        task_type: TaskType,
    },
}

/// The Gatekeeper validates candidates before they reach the merge engine
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// A contact needs a name or an email
    pub fn validate_contact(&self, contact: &Contact) -> ValidationResult {
        let mut reasons = Vec::new();
        if contact.name.is_empty() && contact.email.is_empty() {
            reasons.push(RejectionReason::MissingIdentity);
        }
        ValidationResult::from_reasons(reasons)
    }

    /// A deal needs a title and a value above the floor
    pub fn validate_deal(&self, deal: &Deal) -> ValidationResult {
        let mut reasons = Vec::new();
        if deal.title.is_empty() {
            reasons.push(RejectionReason::MissingTitle);
        }
        // NaN compares false, so it is rejected as well
        if !(deal.value > self.config.min_deal_value) {
            reasons.push(RejectionReason::ValueTooLow {
                value: deal.value,
                min: self.config.min_deal_value,
            });
        }
        ValidationResult::from_reasons(reasons)
    }

    /// A task needs a title of at least the minimum length
    pub fn validate_task(&self, task: &Task) -> ValidationResult {
        let mut reasons = Vec::new();
        let len = task.title.chars().count();
        if len == 0 {
            reasons.push(RejectionReason::MissingTitle);
        } else if len < self.config.min_task_title_len {
            reasons.push(RejectionReason::TitleTooShort {
                len,
                min: self.config.min_task_title_len,
            });
        }
        ValidationResult::from_reasons(reasons)
    }

    /// Validate a task and, if it passes, check it against the batch seen so far
    pub fn admit_task(&self, task: &Task, deduper: &mut BatchDeduper) -> ValidationResult {
        let result = self.validate_task(task);
        if !result.is_accepted() {
            return result;
        }
        if deduper.admit(task) {
            result
        } else {
            ValidationResult::from_reasons(vec![RejectionReason::DuplicateInBatch {
                title: task.title.clone(),
                task_type: task.task_type,
            }])
        }
    }
}
