// lib/src/errors.rs

use sled::transaction::UnabortableTransactionError;
use thiserror::Error;

use models::errors::ValidationError;

#[derive(Debug, Error)]
pub enum HospitalError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    /// The storage engine interrupted a transaction (for sled, a conflict it
    /// will retry). Only ever raised inside a unit of work.
    #[error("Transaction interrupted: {0}")]
    TransactionInterrupted(UnabortableTransactionError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, HospitalError>;

impl HospitalError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        HospitalError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        HospitalError::Conflict(message.into())
    }
}

impl From<sled::Error> for HospitalError {
    fn from(err: sled::Error) -> Self {
        HospitalError::DatabaseError(err.to_string())
    }
}

impl From<UnabortableTransactionError> for HospitalError {
    fn from(err: UnabortableTransactionError) -> Self {
        HospitalError::TransactionInterrupted(err)
    }
}

impl From<rmp_serde::encode::Error> for HospitalError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        HospitalError::SerializationError(format!("MessagePack encode error: {}", err))
    }
}

impl From<rmp_serde::decode::Error> for HospitalError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        HospitalError::DeserializationError(format!("MessagePack decode error: {}", err))
    }
}

impl From<anyhow::Error> for HospitalError {
    fn from(err: anyhow::Error) -> Self {
        HospitalError::InternalError(format!("An internal error occurred: {}", err))
    }
}
