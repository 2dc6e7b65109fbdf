// lib/src/storage_engine/storage_engine.rs

use crate::errors::Result;

/// Reads and writes staged inside one atomic unit of work.
pub trait Transaction {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<()>;
    fn remove(&mut self, key: &[u8]) -> Result<()>;
}

/// An ordered key-value store with serializable multi-key transactions.
pub trait StorageEngine: Send + Sync + 'static {
    fn get_type(&self) -> &'static str;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn insert(&self, key: &[u8], value: Vec<u8>) -> Result<()>;

    /// Returns whether the key was present.
    fn remove(&self, key: &[u8]) -> Result<bool>;

    /// All entries whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Runs `work` atomically: either every write it stages is applied, or,
    /// when it returns an error, none is. `work` may be invoked more than
    /// once if the engine retries on conflict.
    fn transaction(&self, work: &dyn Fn(&mut dyn Transaction) -> Result<()>) -> Result<()>;

    fn flush(&self) -> Result<()>;
}
