//! Merge engine - reconciles an extracted batch with the persisted collection
//!
//! Records are keyed by id. The persisted records keep their position, a
//! batch record with a known id replaces the stored one wholesale, and new
//! ids are appended in batch order. Nothing is ever removed here; deletion
//! is an explicit store operation.

use crate::collection::{Collection, Timestamp};
use crate::record::Record;
use crate::traits::CollectionStore;
use std::collections::HashMap;

/// Overlay `batch` onto the records of type `R` in `persisted`
///
/// Returns the updated collection with `last_sync` advanced to `now`
/// (or kept, if it is already later). Other record types pass through
/// untouched.
///
/// # Examples
///
/// ```
/// use crmsync_domain::{merge, Collection, Contact};
///
/// let mut persisted = Collection::new();
/// persisted.contacts.push(Contact { id: "1".into(), name: "Old".into(), ..Default::default() });
///
/// let batch = vec![
///     Contact { id: "1".into(), name: "New".into(), ..Default::default() },
///     Contact { id: "2".into(), name: "Other".into(), ..Default::default() },
/// ];
///
/// let merged = merge(batch, persisted, 1_000);
/// assert_eq!(merged.contacts.len(), 2);
/// assert_eq!(merged.contacts[0].name, "New");
/// assert_eq!(merged.last_sync, Some(1_000));
/// ```
pub fn merge<R: Record>(batch: Vec<R>, mut persisted: Collection, now: Timestamp) -> Collection {
    let existing = std::mem::take(R::records_mut(&mut persisted));

    let mut positions: HashMap<String, usize> = HashMap::with_capacity(existing.len() + batch.len());
    let mut merged: Vec<R> = Vec::with_capacity(existing.len() + batch.len());

    for record in existing.into_iter().chain(batch) {
        match positions.get(record.id()) {
            Some(&pos) => merged[pos] = record,
            None => {
                positions.insert(record.id().to_string(), merged.len());
                merged.push(record);
            }
        }
    }

    *R::records_mut(&mut persisted) = merged;
    persisted.touch(now);
    persisted
}

/// Merge a batch into a store as one read-modify-write transaction
///
/// The store decides isolation (see [`CollectionStore::transact`]); on error
/// the stored collection is left exactly as it was.
pub fn merge_into<S, R>(store: &mut S, batch: Vec<R>, now: Timestamp) -> Result<Collection, S::Error>
where
    S: CollectionStore,
    R: Record,
{
    store.transact(R::TYPE, move |persisted| merge(batch, persisted, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Contact, Deal, Task, TaskType};

    fn deal(id: &str, title: &str, value: f64) -> Deal {
        Deal {
            id: id.to_string(),
            title: title.to_string(),
            value,
            ..Default::default()
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut persisted = Collection::new();
        persisted.deals.push(deal("1", "v1", 10.0));

        let merged = merge(vec![deal("1", "v2", 20.0), deal("2", "v3", 30.0)], persisted, 5);

        assert_eq!(merged.deals.len(), 2);
        assert_eq!(merged.deals[0], deal("1", "v2", 20.0));
        assert_eq!(merged.deals[1], deal("2", "v3", 30.0));
    }

    #[test]
    fn test_replacement_is_wholesale() {
        let mut persisted = Collection::new();
        persisted.contacts.push(Contact {
            id: "c".to_string(),
            name: "Ann".to_string(),
            phone: "555-123-4567".to_string(),
            tags: vec!["vip".to_string()],
            ..Default::default()
        });

        let merged = merge(
            vec![Contact {
                id: "c".to_string(),
                name: "Ann B".to_string(),
                ..Default::default()
            }],
            persisted,
            1,
        );

        // fields missing from the new record are not carried over
        assert_eq!(merged.contacts[0].phone, "");
        assert!(merged.contacts[0].tags.is_empty());
    }

    #[test]
    fn test_other_types_untouched() {
        let mut persisted = Collection::new();
        persisted.tasks.push(Task {
            id: "t1".to_string(),
            task_type: TaskType::Call,
            title: "Call Bob".to_string(),
            ..Default::default()
        });

        let merged = merge(vec![deal("d1", "Big", 1.0)], persisted.clone(), 9);
        assert_eq!(merged.tasks, persisted.tasks);
        assert_eq!(merged.deals.len(), 1);
    }

    #[test]
    fn test_empty_batch_still_advances_sync() {
        let merged = merge::<Deal>(Vec::new(), Collection::new(), 42);
        assert!(merged.deals.is_empty());
        assert_eq!(merged.last_sync, Some(42));
    }

    #[test]
    fn test_duplicate_ids_within_batch_collapse() {
        let merged = merge(
            vec![deal("1", "first", 1.0), deal("1", "second", 2.0)],
            Collection::new(),
            1,
        );
        assert_eq!(merged.deals.len(), 1);
        assert_eq!(merged.deals[0].title, "second");
    }
}
