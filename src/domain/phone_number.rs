//! src/domain/phone_number.rs

use crate::domain::ValidationError;

/// A local subscriber phone number, without country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Returns an instance of `PhoneNumber` if the input is exactly
    /// ten ASCII digits, an error otherwise.
    pub fn parse(s: String) -> Result<PhoneNumber, ValidationError> {
        let is_ten_digits = s.len() == 10 && s.chars().all(|c| c.is_ascii_digit());
        if is_ten_digits {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidPhoneNumber(s))
        }
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
