// lib/src/database.rs

use std::cell::RefCell;
use std::fmt::Display;
use std::sync::Arc;

use log::debug;

use models::Record;

use crate::errors::{HospitalError, Result};
use crate::storage_engine::storage_utils::{
    counter_key, decode_counter, deserialize_record, encode_counter, kind_prefix, record_key, sequence_key,
    serialize_record, unique_key,
};
use crate::storage_engine::{
    create_storage, InMemoryStorage, StorageConfig, StorageEngine, Transaction,
};

/// A typed entity store on top of a `StorageEngine`.
///
/// Single-record reads and writes go straight to the engine; anything that
/// touches more than one record goes through [`Database::transaction`].
#[derive(Clone)]
pub struct Database {
    storage_engine: Arc<dyn StorageEngine>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("engine", &self.storage_engine.get_type())
            .finish()
    }
}

impl Database {
    pub fn new(storage_engine: Arc<dyn StorageEngine>) -> Self {
        Database { storage_engine }
    }

    /// Creates a database based on the provided storage configuration.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Ok(Database::new(create_storage(config)?))
    }

    pub fn in_memory() -> Self {
        Database::new(Arc::new(InMemoryStorage::new()))
    }

    /// Returns a reference to the underlying storage engine.
    pub fn storage(&self) -> &Arc<dyn StorageEngine> {
        &self.storage_engine
    }

    pub fn get<R: Record>(&self, id: impl Display) -> Result<Option<R>> {
        let key = record_key(R::KIND, &id.to_string());
        match self.storage_engine.get(&key)? {
            Some(bytes) => Ok(Some(deserialize_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Like `get`, but a missing record is a `NotFound` error.
    pub fn fetch<R: Record>(&self, id: impl Display) -> Result<R> {
        let id = id.to_string();
        self.get::<R>(&id)?
            .ok_or_else(|| HospitalError::not_found(R::LABEL, id))
    }

    pub fn exists<R: Record>(&self, id: impl Display) -> Result<bool> {
        let key = record_key(R::KIND, &id.to_string());
        Ok(self.storage_engine.get(&key)?.is_some())
    }

    /// Every record of one kind, newest first.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let mut records = self
            .storage_engine
            .scan_prefix(&kind_prefix(R::KIND))?
            .into_iter()
            .map(|(_, bytes)| deserialize_record::<R>(&bytes))
            .collect::<Result<Vec<_>>>()?;
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    /// Inserts or replaces a single record.
    pub fn put<R: Record>(&self, record: &R) -> Result<()> {
        let key = record_key(R::KIND, &record.key());
        self.storage_engine.insert(&key, serialize_record(record)?)
    }

    /// Returns whether a record was removed.
    pub fn delete<R: Record>(&self, id: impl Display) -> Result<bool> {
        let key = record_key(R::KIND, &id.to_string());
        self.storage_engine.remove(&key)
    }

    /// Runs `work` as one atomic unit: all of its writes are applied, or
    /// none are if it returns an error. `work` may run more than once when
    /// the engine retries a conflicting transaction, so it must not have
    /// side effects outside the unit of work.
    pub fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: Fn(&mut UnitOfWork<'_>) -> Result<T>,
    {
        let output = RefCell::new(None);
        self.storage_engine.transaction(&|tx: &mut dyn Transaction| {
            let mut uow = UnitOfWork { tx };
            let value = work(&mut uow)?;
            *output.borrow_mut() = Some(value);
            Ok(())
        })?;
        output
            .into_inner()
            .ok_or_else(|| HospitalError::InternalError("transaction produced no result".to_string()))
    }

    pub fn flush(&self) -> Result<()> {
        self.storage_engine.flush()
    }
}

/// Typed access to the records inside one transaction.
pub struct UnitOfWork<'a> {
    tx: &'a mut dyn Transaction,
}

impl UnitOfWork<'_> {
    pub fn get<R: Record>(&mut self, id: impl Display) -> Result<Option<R>> {
        let key = record_key(R::KIND, &id.to_string());
        match self.tx.get(&key)? {
            Some(bytes) => Ok(Some(deserialize_record(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn fetch<R: Record>(&mut self, id: impl Display) -> Result<R> {
        let id = id.to_string();
        self.get::<R>(&id)?
            .ok_or_else(|| HospitalError::not_found(R::LABEL, id))
    }

    pub fn put<R: Record>(&mut self, record: &R) -> Result<()> {
        let key = record_key(R::KIND, &record.key());
        self.tx.insert(&key, serialize_record(record)?)
    }

    pub fn delete<R: Record>(&mut self, id: impl Display) -> Result<()> {
        let key = record_key(R::KIND, &id.to_string());
        self.tx.remove(&key)
    }

    /// Increments the named counter and returns the new value. The first
    /// value handed out is 1.
    pub fn next_sequence(&mut self, name: &str) -> Result<u64> {
        let key = sequence_key(name);
        let current = match self.tx.get(&key)? {
            Some(bytes) => decode_counter(&bytes)?,
            None => 0,
        };
        let next = current + 1;
        self.tx.insert(&key, encode_counter(next))?;
        debug!("Sequence {} advanced to {}", name, next);
        Ok(next)
    }

    /// Current value of a tally; an absent tally reads as 0.
    pub fn counter(&mut self, name: &str) -> Result<u64> {
        match self.tx.get(&counter_key(name))? {
            Some(bytes) => decode_counter(&bytes),
            None => Ok(0),
        }
    }

    /// Moves a tally by `delta` and returns the new value. A tally never
    /// drops below 0.
    pub fn adjust_counter(&mut self, name: &str, delta: i64) -> Result<u64> {
        let current = self.counter(name)?;
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.tx.insert(&counter_key(name), encode_counter(next))?;
        Ok(next)
    }

    pub fn clear_counter(&mut self, name: &str) -> Result<()> {
        self.tx.remove(&counter_key(name))
    }

    /// The id of the record holding `value` within `scope`, if any.
    pub fn unique_owner(&mut self, scope: &str, value: &str) -> Result<Option<String>> {
        Ok(self
            .tx
            .get(&unique_key(scope, value))?
            .map(|owner| String::from_utf8_lossy(&owner).into_owned()))
    }

    /// Claims `value` within `scope` for `owner`. Returns false, and changes
    /// nothing, when another owner already holds it.
    pub fn claim_unique(&mut self, scope: &str, value: &str, owner: &str) -> Result<bool> {
        match self.unique_owner(scope, value)? {
            Some(current) if current != owner => Ok(false),
            Some(_) => Ok(true),
            None => {
                self.tx
                    .insert(&unique_key(scope, value), owner.as_bytes().to_vec())?;
                Ok(true)
            }
        }
    }

    pub fn release_unique(&mut self, scope: &str, value: &str) -> Result<()> {
        self.tx.remove(&unique_key(scope, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::SledStorage;
    use models::medical::{NewWard, Ward, WardType};
    use rust_decimal::Decimal;

    fn ward(name: &str) -> Ward {
        Ward::from_new(NewWard {
            name: name.to_string(),
            ward_type: WardType::General,
            capacity: 4,
            charge_per_day: Decimal::from(100),
            floor: None,
        })
    }

    fn engines() -> Vec<Database> {
        vec![
            Database::in_memory(),
            Database::new(Arc::new(SledStorage::temporary().unwrap())),
        ]
    }

    #[test]
    fn put_get_and_delete() {
        for db in engines() {
            let w = ward("East");
            db.put(&w).unwrap();
            assert_eq!(db.get::<Ward>(w.id).unwrap(), Some(w.clone()));
            assert!(db.delete::<Ward>(w.id).unwrap());
            assert!(!db.delete::<Ward>(w.id).unwrap());
            assert!(matches!(
                db.fetch::<Ward>(w.id),
                Err(HospitalError::NotFound { kind: "ward", .. })
            ));
        }
    }

    #[test]
    fn list_is_newest_first() {
        for db in engines() {
            let mut older = ward("Old");
            older.created_at = older.created_at - chrono::Duration::hours(1);
            let newer = ward("New");
            db.put(&older).unwrap();
            db.put(&newer).unwrap();
            let names: Vec<String> = db.list::<Ward>().unwrap().into_iter().map(|w| w.name).collect();
            assert_eq!(names, vec!["New".to_string(), "Old".to_string()]);
        }
    }

    #[test]
    fn failed_transaction_writes_nothing() {
        for db in engines() {
            let w = ward("Rollback");
            let result: Result<()> = db.transaction(|uow| {
                uow.put(&w)?;
                uow.next_sequence("wards")?;
                Err(HospitalError::conflict("abort"))
            });
            assert!(matches!(result, Err(HospitalError::Conflict(_))));
            assert_eq!(db.get::<Ward>(w.id).unwrap(), None);
            let first = db.transaction(|uow| uow.next_sequence("wards")).unwrap();
            assert_eq!(first, 1);
        }
    }

    #[test]
    fn sequences_increase_and_reads_see_staged_writes() {
        for db in engines() {
            let w = ward("Staged");
            let (a, b, seen) = db
                .transaction(|uow| {
                    let a = uow.next_sequence("demo")?;
                    let b = uow.next_sequence("demo")?;
                    uow.put(&w)?;
                    let seen = uow.get::<Ward>(w.id)?.is_some();
                    Ok((a, b, seen))
                })
                .unwrap();
            assert_eq!((a, b, seen), (1, 2, true));
            assert_eq!(db.transaction(|uow| uow.next_sequence("demo")).unwrap(), 3);
            assert!(db.list::<Ward>().unwrap().len() == 1);
        }
    }

    #[test]
    fn counters_move_both_ways_and_stop_at_zero() {
        for db in engines() {
            assert_eq!(db.transaction(|uow| uow.counter("beds/w1")).unwrap(), 0);
            assert_eq!(db.transaction(|uow| uow.adjust_counter("beds/w1", 2)).unwrap(), 2);
            assert_eq!(db.transaction(|uow| uow.adjust_counter("beds/w1", -1)).unwrap(), 1);
            assert_eq!(db.transaction(|uow| uow.adjust_counter("beds/w1", -5)).unwrap(), 0);
            db.transaction(|uow| uow.clear_counter("beds/w1")).unwrap();
            assert_eq!(db.transaction(|uow| uow.counter("beds/w1")).unwrap(), 0);
        }
    }

    #[test]
    fn unique_claims_are_exclusive() {
        for db in engines() {
            assert!(db.transaction(|uow| uow.claim_unique("code", "CBC", "a")).unwrap());
            assert!(db.transaction(|uow| uow.claim_unique("code", "CBC", "a")).unwrap());
            assert!(!db.transaction(|uow| uow.claim_unique("code", "CBC", "b")).unwrap());
            db.transaction(|uow| uow.release_unique("code", "CBC")).unwrap();
            assert!(db.transaction(|uow| uow.claim_unique("code", "CBC", "b")).unwrap());
        }
    }

    #[test]
    fn sled_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_directory: dir.path().join("db"),
            ..StorageConfig::default()
        };
        let w = ward("Durable");
        {
            let db = Database::open(&config).unwrap();
            db.transaction(|uow| uow.put(&w)).unwrap();
            db.flush().unwrap();
        }
        let db = Database::open(&config).unwrap();
        assert_eq!(db.fetch::<Ward>(w.id).unwrap().name, "Durable");
    }
}
