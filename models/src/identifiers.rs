// models/src/identifiers.rs

use std::fmt;

use crate::errors::{ValidationError, ValidationResult};

/// Human-readable, sequence-backed codes such as `PAT-00042` or `INV-000007`.
///
/// The numeric part comes from an atomic per-kind sequence held by the
/// entity store; the format only decides how that number is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFormat {
    pub prefix: &'static str,
    pub width: usize,
    /// Name of the store sequence that feeds this format.
    pub sequence: &'static str,
}

/// Patient codes: `PAT-` followed by a 5-digit zero-padded number.
pub const PATIENT_CODE: CodeFormat = CodeFormat {
    prefix: "PAT",
    width: 5,
    sequence: "patient_code",
};

/// Invoice numbers: `INV-` followed by a 6-digit zero-padded number.
pub const INVOICE_NUMBER: CodeFormat = CodeFormat {
    prefix: "INV",
    width: 6,
    sequence: "invoice_number",
};

impl CodeFormat {
    /// Renders `value` as `PREFIX-000value`. Values wider than the padding
    /// are printed in full.
    pub fn format(&self, value: u64) -> String {
        format!("{}-{:0width$}", self.prefix, value, width = self.width)
    }

    /// Parses a code back into its sequence number.
    ///
    /// # Errors
    /// Returns `ValidationError::MalformedCode` if the prefix does not match
    /// or the numeric part is shorter than the padding or not a number.
    pub fn parse(&self, code: &str) -> ValidationResult<u64> {
        let malformed = || ValidationError::MalformedCode(code.to_string());
        let digits = code
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(malformed)?;
        if digits.len() < self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        digits.parse::<u64>().map_err(|_| malformed())
    }
}

impl fmt::Display for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, "X".repeat(self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::{INVOICE_NUMBER, PATIENT_CODE};
    use crate::errors::ValidationError;
    use regex::Regex;

    #[test]
    fn should_pad_patient_codes_to_five_digits() {
        assert_eq!(PATIENT_CODE.format(1), "PAT-00001");
        assert_eq!(PATIENT_CODE.format(12345), "PAT-12345");
        let re = Regex::new(r"^PAT-\d{5}$").unwrap();
        assert!(re.is_match(&PATIENT_CODE.format(42)));
    }

    #[test]
    fn should_pad_invoice_numbers_to_six_digits() {
        assert_eq!(INVOICE_NUMBER.format(7), "INV-000007");
        let re = Regex::new(r"^INV-\d{6}$").unwrap();
        assert!(re.is_match(&INVOICE_NUMBER.format(999_999)));
    }

    #[test]
    fn should_not_truncate_overflowing_values() {
        assert_eq!(PATIENT_CODE.format(123_456), "PAT-123456");
    }

    #[test]
    fn should_parse_codes_back() {
        assert_eq!(PATIENT_CODE.parse("PAT-00042"), Ok(42));
        assert_eq!(INVOICE_NUMBER.parse("INV-000100"), Ok(100));
    }

    #[test]
    fn should_reject_malformed_codes() {
        for bad in ["PAT00042", "INV-000001", "PAT-42", "PAT-0004x", ""] {
            assert_eq!(
                PATIENT_CODE.parse(bad),
                Err(ValidationError::MalformedCode(bad.to_string()))
            );
        }
    }
}
