// lib/src/storage_engine/storage_utils.rs

use byteorder::{BigEndian, ByteOrder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{HospitalError, Result};

/// Records are stored as `<kind>/<id>`.
pub fn record_key(kind: &str, id: &str) -> Vec<u8> {
    format!("{}/{}", kind, id).into_bytes()
}

/// Prefix shared by every record of one kind.
pub fn kind_prefix(kind: &str) -> Vec<u8> {
    format!("{}/", kind).into_bytes()
}

/// Counters live under their own prefix so they never show up in a record scan.
pub fn sequence_key(name: &str) -> Vec<u8> {
    format!("__seq/{}", name).into_bytes()
}

/// Running tallies such as the number of beds in a ward. Unlike sequences
/// they go down as well as up.
pub fn counter_key(name: &str) -> Vec<u8> {
    format!("__count/{}", name).into_bytes()
}

/// Unique-value claims, e.g. `__uniq/lab_code/CBC`, map a value to the id
/// of the record that owns it.
pub fn unique_key(scope: &str, value: &str) -> Vec<u8> {
    format!("__uniq/{}/{}", scope, value).into_bytes()
}

/// Helper to serialize a record to MessagePack, keeping field names so
/// records stay readable across struct changes.
pub fn serialize_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(record)?)
}

/// Helper to deserialize MessagePack bytes into a record.
pub fn deserialize_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

pub fn encode_counter(value: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 8];
    BigEndian::write_u64(&mut buf, value);
    buf
}

pub fn decode_counter(bytes: &[u8]) -> Result<u64> {
    if bytes.len() != 8 {
        return Err(HospitalError::DeserializationError(format!(
            "sequence value has {} bytes, expected 8",
            bytes.len()
        )));
    }
    Ok(BigEndian::read_u64(bytes))
}
