// models/src/errors.rs

pub use thiserror::Error;

/// A validation error raised by the domain model before anything is written.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// A required text field was empty.
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
    /// A field carried a value outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    /// A status string did not name a known variant.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
    /// A status change that the workflow does not allow.
    #[error("cannot move {kind} from '{from}' to '{to}'")]
    IllegalTransition {
        kind: &'static str,
        from: String,
        to: String,
    },
    /// A bill must carry at least one line item.
    #[error("a bill needs at least one line item")]
    NoLineItems,
    /// Payments must be strictly positive.
    #[error("payment amount must be greater than zero")]
    NonPositivePayment,
    /// The payment would take the paid amount above the bill total.
    #[error("payment of {amount} exceeds outstanding balance of {balance}")]
    Overpayment { amount: String, balance: String },
    /// An identifier code did not match its expected format.
    #[error("identifier '{0}' is malformed")]
    MalformedCode(String),
    /// A date or time string could not be parsed.
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rejects blank strings for required fields.
pub fn require_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}
