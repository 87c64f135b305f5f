use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AreaCodeError {
    #[error("ZIP code must be exactly 5 digits, got {0} characters")]
    WrongLength(usize),

    #[error("ZIP code must contain only digits")]
    NonDigit,
}

/// A 5-digit US ZIP / ZCTA code. Never carries a ZIP+4 extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AreaCode(String);

impl AreaCode {
    /// Trims surrounding whitespace, then requires exactly 5 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, AreaCodeError> {
        let trimmed = raw.trim();
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(AreaCodeError::NonDigit);
        }
        if trimmed.len() != 5 {
            return Err(AreaCodeError::WrongLength(trimmed.chars().count()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AreaCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
