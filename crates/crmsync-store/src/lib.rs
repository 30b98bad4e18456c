//! crmsync Storage Layer
//!
//! Implements the `CollectionStore` trait on top of SQLite.
//!
//! # Architecture
//!
//! - One table per record type, ordered by a `position` column
//! - A `sync_state` row for the shared `last_sync` timestamp
//! - Every mutation runs in a single `BEGIN IMMEDIATE` transaction, so
//!   independent processes sharing the database file serialise on the
//!   write lock instead of losing each other's updates
//!
//! # Examples
//!
//! ```no_run
//! use crmsync_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for collection operations
//! ```

#![warn(missing_docs)]

mod config;
mod rows;

pub use config::StoreConfig;

use crmsync_domain::traits::CollectionStore;
use crmsync_domain::{Collection, RecordType, Timestamp};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// Another connection held the write lock for longer than the busy timeout
    #[error("Store is busy: another writer holds the lock")]
    Busy,

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => StoreError::Busy,
            _ => StoreError::Database(e),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

const LAST_SYNC_KEY: &str = "last_sync";

/// SQLite-based implementation of CollectionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread (or process) should
/// open its own SqliteStore on the same database file; isolation between
/// them comes from SQLite's locking, not from in-process mutexes.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store with default settings
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crmsync_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("crmsync.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open(path, &StoreConfig::default())
    }

    /// Open a store with explicit settings
    pub fn open<P: AsRef<Path>>(path: P, config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(config.busy_timeout())?;

        // WAL lets readers proceed while a merge holds the write lock;
        // in-memory databases report "memory" and ignore it
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("SQLite journal mode: {}", mode);

        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored records per type
    pub fn counts(&self) -> Result<Vec<(RecordType, usize)>, StoreError> {
        RecordType::ALL
            .iter()
            .map(|&rt| -> Result<(RecordType, usize), StoreError> {
                let sql = format!("SELECT COUNT(*) FROM {}", rows::table(rt));
                let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
                Ok((rt, n as usize))
            })
            .collect()
    }

    /// Time of the last successful merge, if any
    pub fn last_sync(&self) -> Result<Option<Timestamp>, StoreError> {
        read_last_sync(&self.conn)
    }
}

/// Read the records of one type plus `last_sync`
fn read_collection(conn: &Connection, record_type: RecordType) -> Result<Collection, StoreError> {
    let mut collection = Collection::new();
    match record_type {
        RecordType::Contacts => collection.contacts = rows::read_contacts(conn)?,
        RecordType::Deals => collection.deals = rows::read_deals(conn)?,
        RecordType::Tasks => collection.tasks = rows::read_tasks(conn)?,
    }
    collection.last_sync = read_last_sync(conn)?;
    Ok(collection)
}

/// Replace the rows of one type and advance `last_sync`
fn write_collection(
    conn: &Connection,
    record_type: RecordType,
    collection: &Collection,
) -> Result<(), StoreError> {
    conn.execute(&format!("DELETE FROM {}", rows::table(record_type)), [])?;
    match record_type {
        RecordType::Contacts => rows::write_contacts(conn, &collection.contacts)?,
        RecordType::Deals => rows::write_deals(conn, &collection.deals)?,
        RecordType::Tasks => rows::write_tasks(conn, &collection.tasks)?,
    }
    if let Some(ts) = collection.last_sync {
        conn.execute(
            "INSERT INTO sync_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = MAX(value, excluded.value)",
            params![LAST_SYNC_KEY, ts as i64],
        )?;
    }
    Ok(())
}

fn read_last_sync(conn: &Connection) -> Result<Option<Timestamp>, StoreError> {
    let value: Option<i64> = conn
        .query_row(
            "SELECT value FROM sync_state WHERE key = ?1",
            params![LAST_SYNC_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.map(|v| v as Timestamp))
}

impl CollectionStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, record_type: RecordType) -> Result<Collection, Self::Error> {
        // deferred transaction so records and last_sync come from one snapshot
        let tx = self.conn.unchecked_transaction()?;
        let collection = read_collection(&tx, record_type)?;
        tx.commit()?;
        Ok(collection)
    }

    fn set(&mut self, record_type: RecordType, collection: &Collection) -> Result<(), Self::Error> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        write_collection(&tx, record_type, collection)?;
        tx.commit()?;
        Ok(())
    }

    fn transact<F>(&mut self, record_type: RecordType, update: F) -> Result<Collection, Self::Error>
    where
        F: FnOnce(Collection) -> Collection,
    {
        let tx = match self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
        {
            Ok(tx) => tx,
            Err(e) => {
                let err = StoreError::from(e);
                warn!("Could not begin {} transaction: {}", record_type, err);
                return Err(err);
            }
        };

        let current = read_collection(&tx, record_type)?;
        let updated = update(current);
        write_collection(&tx, record_type, &updated)?;

        // re-read so the caller sees last_sync as actually persisted
        let persisted = read_collection(&tx, record_type)?;
        tx.commit()?;

        debug!(
            "Committed {} transaction ({} records)",
            record_type,
            persisted.len(record_type)
        );
        Ok(persisted)
    }

    fn delete(&mut self, record_type: RecordType, id: &str) -> Result<bool, Self::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", rows::table(record_type));
        let changed = self.conn.execute(&sql, params![id])?;
        Ok(changed > 0)
    }
}
