// lib/src/storage_engine/sled_storage.rs

use std::fs;

use log::{debug, error, info};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use sled::{Db, Tree};

use crate::errors::{HospitalError, Result};
use crate::storage_engine::config::StorageConfig;
use crate::storage_engine::storage_engine::{StorageEngine, Transaction};

const HOSPITAL_TREE: &str = "hospital";

/// Sled-backed storage. Every record lives in a single tree so that any
/// set of records can be updated in one sled transaction.
pub struct SledStorage {
    db: Db,
    tree: Tree,
}

impl SledStorage {
    /// Opens (or creates) the database under `config.data_directory`.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let path = &config.data_directory;
        if !path.exists() {
            info!("Creating database directory at {:?}", path);
            fs::create_dir_all(path).map_err(|e| {
                error!("Failed to create database directory at {:?}: {}", path, e);
                HospitalError::DatabaseError(format!(
                    "Failed to create database directory at {:?}: {}",
                    path, e
                ))
            })?;
        } else if !path.is_dir() {
            return Err(HospitalError::DatabaseError(format!(
                "Path {:?} is not a directory",
                path
            )));
        }

        let db = sled::Config::new()
            .path(path)
            .use_compression(config.use_compression)
            .cache_capacity(config.cache_capacity)
            .open()
            .map_err(|e| {
                error!("Failed to open Sled database at {:?}: {}", path, e);
                HospitalError::DatabaseError(format!(
                    "Failed to open Sled database at {:?}: {}. Ensure the directory is accessible.",
                    path, e
                ))
            })?;
        info!("Opened Sled database at {:?}", path);
        Self::from_db(db)
    }

    /// A throwaway database removed on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let tree = db.open_tree(HOSPITAL_TREE)?;
        Ok(SledStorage { db, tree })
    }
}

struct SledTransaction<'a> {
    tree: &'a TransactionalTree,
}

impl Transaction for SledTransaction<'_> {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|value| value.to_vec()))
    }

    fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.tree.remove(key)?;
        Ok(())
    }
}

impl StorageEngine for SledStorage {
    fn get_type(&self) -> &'static str {
        "sled"
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|value| value.to_vec()))
    }

    fn insert(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<bool> {
        Ok(self.tree.remove(key)?.is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.tree
            .scan_prefix(prefix)
            .map(|item| {
                let (key, value) = item?;
                Ok((key.to_vec(), value.to_vec()))
            })
            .collect()
    }

    fn transaction(&self, work: &dyn Fn(&mut dyn Transaction) -> Result<()>) -> Result<()> {
        self.tree
            .transaction(|tree| {
                let mut tx = SledTransaction { tree };
                work(&mut tx).map_err(|err| match err {
                    // Hand conflicts back to sled so it can retry the closure.
                    HospitalError::TransactionInterrupted(inner) => {
                        debug!("Sled transaction interrupted: {}", inner);
                        ConflictableTransactionError::from(inner)
                    }
                    other => ConflictableTransactionError::Abort(other),
                })
            })
            .map_err(|err| match err {
                TransactionError::Abort(inner) => inner,
                TransactionError::Storage(inner) => HospitalError::from(inner),
            })
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
