//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Collection, RecordType};

/// Trait for persisting the record collection
///
/// Implemented by the infrastructure layer (crmsync-store)
///
/// Several independent processes may hold the same store open. Every
/// mutation therefore goes through a single transaction per record type;
/// concurrent transactions on the same type must serialise so that exactly
/// one read-modify-write wins at a time and none is lost.
pub trait CollectionStore {
    /// Error type for store operations
    type Error;

    /// Records of one type plus the shared `last_sync`
    ///
    /// Slots for the other record types are left empty.
    fn get(&self, record_type: RecordType) -> Result<Collection, Self::Error>;

    /// Replace every record of one type with the ones in `collection`
    ///
    /// `last_sync` is taken from `collection` but never moves backwards.
    fn set(&mut self, record_type: RecordType, collection: &Collection) -> Result<(), Self::Error>;

    /// Atomically read the records of one type, apply `update` and write back
    ///
    /// Either the whole updated collection is persisted and returned, or an
    /// error is returned and the stored state is unchanged.
    fn transact<F>(&mut self, record_type: RecordType, update: F) -> Result<Collection, Self::Error>
    where
        F: FnOnce(Collection) -> Collection;

    /// Remove exactly one record; returns whether it existed
    fn delete(&mut self, record_type: RecordType, id: &str) -> Result<bool, Self::Error>;

    /// Full snapshot of every record type
    fn load(&self) -> Result<Collection, Self::Error> {
        let mut all = Collection::new();
        for record_type in RecordType::ALL {
            let part = self.get(record_type)?;
            match record_type {
                RecordType::Contacts => all.contacts = part.contacts,
                RecordType::Deals => all.deals = part.deals,
                RecordType::Tasks => all.tasks = part.tasks,
            }
            all.last_sync = all.last_sync.max(part.last_sync);
        }
        Ok(all)
    }
}
