// lib/src/lib.rs

//! Entity store and domain services for the hospital service.
//!
//! Storage engines live in `storage_engine`, the typed facade and its
//! transactions in `database`, and the business operations in `services`.

pub mod database;
pub mod errors;
pub mod services;
pub mod storage_engine;

pub use crate::database::{Database, UnitOfWork};
pub use crate::errors::{HospitalError, Result};
pub use crate::services::Services;
pub use crate::storage_engine::{create_storage, StorageConfig, StorageEngine, StorageEngineType};
