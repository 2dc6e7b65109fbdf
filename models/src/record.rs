// models/src/record.rs

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A persisted entity. `KIND` names the keyspace the record lives in and
/// `key` is its unique id within that keyspace.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: &'static str;
    /// Singular, human-readable name used in error messages.
    const LABEL: &'static str;

    fn key(&self) -> String;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Implements `Record` for a struct with a `Uuid` `id` and a `created_at` field.
macro_rules! uuid_record {
    ($ty:ty, $kind:literal, $label:literal) => {
        impl $crate::record::Record for $ty {
            const KIND: &'static str = $kind;
            const LABEL: &'static str = $label;

            fn key(&self) -> String {
                self.id.to_string()
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }
        }
    };
}

pub(crate) use uuid_record;
