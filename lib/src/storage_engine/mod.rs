// lib/src/storage_engine/mod.rs

pub mod config;
pub mod inmemory_storage;
pub mod sled_storage;
pub mod storage_engine;
pub mod storage_utils;

pub use config::{StorageConfig, StorageEngineType};
pub use inmemory_storage::InMemoryStorage;
pub use sled_storage::SledStorage;
pub use storage_engine::{StorageEngine, Transaction};

use std::sync::Arc;

use log::info;

use crate::errors::Result;

/// Creates a storage engine instance based on the provided configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn StorageEngine>> {
    info!("Initializing {} storage engine", config.engine);
    match config.engine {
        StorageEngineType::Sled => Ok(Arc::new(SledStorage::open(config)?)),
        StorageEngineType::InMemory => Ok(Arc::new(InMemoryStorage::new())),
    }
}
