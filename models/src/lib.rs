// models/src/lib.rs

//! Shared hospital entities, status enumerations and the pure domain rules
//! that go with them (bill pricing, payment status, lab-test workflow).

pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod record;

pub use errors::{ValidationError, ValidationResult};
pub use identifiers::{CodeFormat, INVOICE_NUMBER, PATIENT_CODE};
pub use record::Record;
