//! Within-batch deduplication for tasks

use crmsync_domain::{Task, TaskType};
use std::collections::HashSet;

/// Remembers the (title, type) pairs admitted during one extraction batch
///
/// Create one per batch; it is not meant to outlive the pass.
#[derive(Debug, Default)]
pub struct BatchDeduper {
    seen: HashSet<(String, TaskType)>,
}

impl BatchDeduper {
    /// Create an empty deduper
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the task's key; false if it was already seen
    pub fn admit(&mut self, task: &Task) -> bool {
        self.seen.insert((task.title.clone(), task.task_type))
    }

    /// Number of distinct keys admitted
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
