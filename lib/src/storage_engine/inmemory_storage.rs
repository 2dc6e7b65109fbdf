// lib/src/storage_engine/inmemory_storage.rs

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::{HospitalError, Result};
use crate::storage_engine::storage_engine::{StorageEngine, Transaction};

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Volatile storage for tests and local runs. Transactions hold the write
/// lock for their whole duration, which makes them trivially serializable.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<Entries>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

fn poisoned<T>(_: T) -> HospitalError {
    HospitalError::LockError("in-memory store lock poisoned".to_string())
}

/// Writes are staged here and only applied once the unit of work succeeds.
struct StagedTransaction<'a> {
    base: &'a Entries,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl Transaction for StagedTransaction<'_> {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.base.get(key).cloned()),
        }
    }

    fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }
}

impl StorageEngine for InMemoryStorage {
    fn get_type(&self) -> &'static str {
        "in_memory"
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn insert(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn transaction(&self, work: &dyn Fn(&mut dyn Transaction) -> Result<()>) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let writes = {
            let mut tx = StagedTransaction {
                base: &*entries,
                writes: BTreeMap::new(),
            };
            work(&mut tx)?;
            tx.writes
        };
        for (key, value) in writes {
            match value {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
