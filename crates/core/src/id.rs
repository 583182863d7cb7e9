//! Strongly-typed identifiers used across the inventory.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};

/// User-facing product code, the logical key for lookups, updates and deletes.
///
/// Only emptiness is checked here. Format rules (digits only, length) belong to
/// the validation rules so they can be tuned without touching stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Parse a code typed by a user. Surrounding whitespace is dropped.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty(Field::Code));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a code read back from storage without re-checking it.
    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Surrogate row identifier assigned by the store.
///
/// Returned from `create` for diagnostics; never used to look records up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;

    #[test]
    fn parse_trims_whitespace() {
        let code = ProductCode::parse("  0042 ").unwrap();
        assert_eq!(code.as_str(), "0042");
    }

    #[test]
    fn parse_rejects_blank() {
        let err = ProductCode::parse("   ").unwrap_err();
        assert_eq!(err.field, Field::Code);
        assert_eq!(err.reason, ValidationReason::Empty);
    }

    #[test]
    fn code_serializes_as_plain_string() {
        let code: ProductCode = "17".parse().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"17\"");
        assert_eq!(serde_json::to_string(&RecordId::new(9)).unwrap(), "9");
    }
}
