//! The persisted collection of records

use crate::record::{Contact, Deal, Record, Task};
use crate::record_type::RecordType;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Current wall-clock time in milliseconds
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

/// All persisted records plus the time of the last successful merge
///
/// Ids are unique within each record type. A store may hand out a
/// collection with only one type populated (see
/// [`CollectionStore::get`](crate::traits::CollectionStore::get)).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    /// Stored contacts
    pub contacts: Vec<Contact>,

    /// Stored deals
    pub deals: Vec<Deal>,

    /// Stored tasks
    pub tasks: Vec<Task>,

    /// When the collection was last merged into, if ever
    pub last_sync: Option<Timestamp>,
}

impl Collection {
    /// Create an empty collection that has never been synced
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records of the given type
    pub fn len(&self, record_type: RecordType) -> usize {
        match record_type {
            RecordType::Contacts => self.contacts.len(),
            RecordType::Deals => self.deals.len(),
            RecordType::Tasks => self.tasks.len(),
        }
    }

    /// True when no records of any type are held
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.deals.is_empty() && self.tasks.is_empty()
    }

    /// Whether a record with this id exists for the type
    pub fn contains(&self, record_type: RecordType, id: &str) -> bool {
        match record_type {
            RecordType::Contacts => self.contacts.iter().any(|r| r.id() == id),
            RecordType::Deals => self.deals.iter().any(|r| r.id() == id),
            RecordType::Tasks => self.tasks.iter().any(|r| r.id() == id),
        }
    }

    /// Remove exactly the record with this id; returns whether one was removed
    pub fn remove(&mut self, record_type: RecordType, id: &str) -> bool {
        fn remove_from<R: Record>(records: &mut Vec<R>, id: &str) -> bool {
            let before = records.len();
            records.retain(|r| r.id() != id);
            records.len() != before
        }

        match record_type {
            RecordType::Contacts => remove_from(&mut self.contacts, id),
            RecordType::Deals => remove_from(&mut self.deals, id),
            RecordType::Tasks => remove_from(&mut self.tasks, id),
        }
    }

    /// Copy of this collection holding only the records of one type
    pub fn only(&self, record_type: RecordType) -> Collection {
        let mut out = Collection {
            last_sync: self.last_sync,
            ..Default::default()
        };
        match record_type {
            RecordType::Contacts => out.contacts = self.contacts.clone(),
            RecordType::Deals => out.deals = self.deals.clone(),
            RecordType::Tasks => out.tasks = self.tasks.clone(),
        }
        out
    }

    /// Advance the sync timestamp; it never moves backwards
    pub fn touch(&mut self, now: Timestamp) {
        self.last_sync = Some(self.last_sync.map_or(now, |prev| prev.max(now)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: format!("Name {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut c = Collection::new();
        c.contacts = vec![contact("1"), contact("2"), contact("3")];

        assert!(c.remove(RecordType::Contacts, "2"));
        assert_eq!(c.len(RecordType::Contacts), 2);
        assert!(!c.contains(RecordType::Contacts, "2"));
        assert!(!c.remove(RecordType::Contacts, "2"));
        assert!(!c.remove(RecordType::Deals, "1"));
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut c = Collection::new();
        assert_eq!(c.last_sync, None);
        c.touch(100);
        assert_eq!(c.last_sync, Some(100));
        c.touch(50);
        assert_eq!(c.last_sync, Some(100));
        c.touch(150);
        assert_eq!(c.last_sync, Some(150));
    }

    #[test]
    fn test_only_keeps_single_type() {
        let mut c = Collection::new();
        c.contacts = vec![contact("1")];
        c.tasks = vec![Task {
            id: "t".to_string(),
            ..Default::default()
        }];
        c.last_sync = Some(7);

        let only = c.only(RecordType::Tasks);
        assert!(only.contacts.is_empty());
        assert_eq!(only.tasks.len(), 1);
        assert_eq!(only.last_sync, Some(7));
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01 in milliseconds
        assert!(now_millis() > 1_577_836_800_000);
    }
}
