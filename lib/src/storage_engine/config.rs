// lib/src/storage_engine/config.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HospitalError;

pub const DEFAULT_DATA_DIRECTORY: &str = "./data/hospital";
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

/// Enum for the supported storage engine types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngineType {
    Sled,
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageEngineType::Sled),
            "in_memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            _ => Err(HospitalError::ConfigurationError(format!(
                "Unknown storage engine type: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::Sled => f.write_str("sled"),
            StorageEngineType::InMemory => f.write_str("in_memory"),
        }
    }
}

/// Storage settings, the `storage:` section of the service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub engine: StorageEngineType,
    pub data_directory: PathBuf,
    pub cache_capacity: u64,
    pub use_compression: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            engine: StorageEngineType::Sled,
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            use_compression: false,
        }
    }
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        StorageConfig {
            engine: StorageEngineType::InMemory,
            ..StorageConfig::default()
        }
    }
}
