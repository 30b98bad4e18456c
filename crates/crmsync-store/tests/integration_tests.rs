//! Integration tests for crmsync-store
//!
//! These tests verify the collection CRUD cycle and the transactional
//! guarantees shared by concurrent writers.

use crmsync_domain::traits::CollectionStore;
use crmsync_domain::{merge, merge_into, Collection, Contact, Deal, RecordType, Task, TaskType};
use crmsync_store::{SqliteStore, StoreConfig};
use std::thread;

fn contact(id: &str, name: &str) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "+91 70275 17327".to_string(),
        tags: vec!["lead".to_string(), "vip".to_string()],
        owner: "Sam".to_string(),
    }
}

fn deal(id: &str, title: &str, value: f64) -> Deal {
    Deal {
        id: id.to_string(),
        title: title.to_string(),
        value,
        pipeline: "Sales".to_string(),
        stage: "Qualified".to_string(),
        contact: "Ann".to_string(),
        owner: "Sam".to_string(),
    }
}

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        task_type: TaskType::Meeting,
        title: title.to_string(),
        due: "Jan 17".to_string(),
        assignee: "Ann".to_string(),
        linked_to: "Renewal".to_string(),
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");

    let store = store.unwrap();
    let empty = store.load().unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.last_sync, None);
}

#[test]
fn test_set_and_get_each_type() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut c = Collection::new();
    c.contacts = vec![contact("c2", "Zed"), contact("c1", "Ann")];
    c.deals = vec![deal("d1", "Renewal", 1200.5)];
    c.tasks = vec![task("t1", "Kickoff meeting")];
    c.last_sync = Some(1_000);

    for rt in RecordType::ALL {
        store.set(rt, &c).unwrap();
    }

    let contacts = store.get(RecordType::Contacts).unwrap();
    // insertion order is kept, not id order
    assert_eq!(contacts.contacts, c.contacts);
    assert!(contacts.deals.is_empty());
    assert_eq!(contacts.last_sync, Some(1_000));

    assert_eq!(store.get(RecordType::Deals).unwrap().deals, c.deals);
    assert_eq!(store.get(RecordType::Tasks).unwrap().tasks, c.tasks);
}

#[test]
fn test_set_replaces_only_its_type() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut c = Collection::new();
    c.contacts = vec![contact("c1", "Ann")];
    c.deals = vec![deal("d1", "Renewal", 10.0)];
    store.set(RecordType::Contacts, &c).unwrap();
    store.set(RecordType::Deals, &c).unwrap();

    store.set(RecordType::Contacts, &Collection::new()).unwrap();

    let all = store.load().unwrap();
    assert!(all.contacts.is_empty());
    assert_eq!(all.deals.len(), 1);
}

#[test]
fn test_merge_into_store_last_write_wins() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    merge_into(&mut store, vec![deal("1", "v1", 10.0)], 100).unwrap();
    let merged = merge_into(
        &mut store,
        vec![deal("1", "v2", 20.0), deal("2", "v3", 30.0)],
        200,
    )
    .unwrap();

    assert_eq!(merged.deals.len(), 2);
    assert_eq!(merged.deals[0].title, "v2");
    assert_eq!(merged.deals[1].title, "v3");
    assert_eq!(merged.last_sync, Some(200));
    assert_eq!(store.get(RecordType::Deals).unwrap(), merged);
}

#[test]
fn test_merge_is_idempotent_through_store() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let batch = vec![contact("c1", "Ann"), contact("c2", "Bob")];

    let once = merge_into(&mut store, batch.clone(), 500).unwrap();
    let twice = merge_into(&mut store, batch, 500).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_last_sync_monotonic_across_merges() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let first = merge_into(&mut store, vec![task("t1", "Call Ann")], 2_000).unwrap();
    // a clock that stepped backwards must not rewind last_sync
    let second = merge_into(&mut store, vec![task("t2", "Email Bob")], 1_000).unwrap();

    assert!(second.last_sync >= first.last_sync);
    assert_eq!(store.last_sync().unwrap(), Some(2_000));
}

#[test]
fn test_delete_exactly_one() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    merge_into(
        &mut store,
        vec![contact("c1", "Ann"), contact("c2", "Bob"), contact("c3", "Cid")],
        1,
    )
    .unwrap();

    assert!(store.delete(RecordType::Contacts, "c2").unwrap());
    assert!(!store.delete(RecordType::Contacts, "c2").unwrap());
    assert!(!store.delete(RecordType::Deals, "c1").unwrap());

    let ids: Vec<String> = store
        .get(RecordType::Contacts)
        .unwrap()
        .contacts
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["c1".to_string(), "c3".to_string()]);
}

#[test]
fn test_rejected_negative_value_leaves_state_intact() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    merge_into(&mut store, vec![deal("d1", "Kept", 5.0)], 1).unwrap();

    let result = merge_into(&mut store, vec![deal("d2", "Broken", -3.0)], 2);
    assert!(result.is_err());

    let after = store.get(RecordType::Deals).unwrap();
    assert_eq!(after.deals.len(), 1);
    assert_eq!(after.last_sync, Some(1));
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crmsync.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        merge_into(&mut store, vec![contact("c1", "Ann")], 10).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let all = store.load().unwrap();
    assert_eq!(all.contacts, vec![contact("c1", "Ann")]);
    assert_eq!(all.last_sync, Some(10));
}

#[test]
fn test_concurrent_merges_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    // create the schema once up front
    SqliteStore::new(&path).unwrap();

    let config = StoreConfig {
        busy_timeout_ms: 30_000,
    };

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            let config = config.clone();
            thread::spawn(move || {
                let mut store = SqliteStore::open(&path, &config).unwrap();
                for i in 0..10 {
                    let id = format!("w{}-{}", worker, i);
                    merge_into(&mut store, vec![contact(&id, "Ann")], 1_000 + i).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let contacts = store.get(RecordType::Contacts).unwrap().contacts;
    assert_eq!(contacts.len(), 40, "every worker's records must survive");
}

#[test]
fn test_delete_composes_with_concurrent_merge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut seed = SqliteStore::new(&path).unwrap();
    merge_into(&mut seed, vec![deal("doomed", "Gone", 1.0)], 1).unwrap();

    let merger = {
        let path = path.clone();
        thread::spawn(move || {
            let mut store = SqliteStore::new(&path).unwrap();
            for i in 0..20 {
                merge_into(&mut store, vec![deal(&format!("d{}", i), "Deal", 5.0)], 10 + i).unwrap();
            }
        })
    };

    let mut deleter = SqliteStore::new(&path).unwrap();
    let mut removed = false;
    for _ in 0..20 {
        removed |= deleter.delete(RecordType::Deals, "doomed").unwrap();
    }
    merger.join().unwrap();

    let deals = deleter.get(RecordType::Deals).unwrap().deals;
    assert!(removed);
    assert!(!deals.iter().any(|d| d.id == "doomed"));
    assert_eq!(deals.len(), 20);
}

#[test]
fn test_transact_sees_committed_state() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    merge_into(&mut store, vec![contact("c1", "Ann")], 1).unwrap();

    let updated = store
        .transact(RecordType::Contacts, |persisted| {
            assert_eq!(persisted.contacts.len(), 1);
            merge(vec![contact("c2", "Bob")], persisted, 2)
        })
        .unwrap();
    assert_eq!(updated.contacts.len(), 2);
}
