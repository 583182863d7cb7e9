//! Error model shared by the product domain and its callers.

use core::fmt;

use thiserror::Error;

use crate::id::ProductCode;

/// Result type used across the inventory layers.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Input field a [`ValidationError`] refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Name,
    Price,
    Quantity,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Name => "name",
            Field::Price => "price",
            Field::Quantity => "quantity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("must not be empty")]
    Empty,

    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    #[error("must contain digits only")]
    NotDigits,

    #[error("must be a number")]
    NotANumber,

    #[error("must be a finite number")]
    NotFinite,

    #[error("must be greater than zero")]
    NotPositive,

    #[error("must not be negative")]
    Negative,

    #[error("is out of range")]
    OutOfRange,
}

/// A single rejected input field.
///
/// Carries the field so callers can attach the message to the right input
/// instead of showing a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    pub fn empty(field: Field) -> Self {
        Self::new(field, ValidationReason::Empty)
    }

    pub fn too_long(field: Field, max: usize) -> Self {
        Self::new(field, ValidationReason::TooLong { max })
    }
}

/// Errors surfaced to callers of the inventory operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// Caller-correctable input problem. Raised before any write.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No record carries the requested code.
    #[error("product not found: {0}")]
    NotFound(ProductCode),

    /// A record with the same code already exists.
    #[error("product code already in use: {0}")]
    DuplicateCode(ProductCode),

    /// The underlying storage failed (I/O, corruption, connection).
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl InventoryError {
    pub fn not_found(code: ProductCode) -> Self {
        Self::NotFound(code)
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// The field to highlight, if this is a validation failure.
    pub fn field(&self) -> Option<Field> {
        match self {
            InventoryError::Validation(e) => Some(e.field),
            InventoryError::DuplicateCode(_) => Some(Field::Code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message_names_field() {
        let err = ValidationError::too_long(Field::Name, 40);
        assert_eq!(err.to_string(), "name must be at most 40 characters");
    }

    #[test]
    fn duplicate_code_points_at_code_field() {
        let code = ProductCode::parse("001").unwrap();
        let err = InventoryError::DuplicateCode(code);
        assert_eq!(err.field(), Some(Field::Code));
        assert_eq!(InventoryError::persistence("disk full").field(), None);
    }

    #[test]
    fn validation_converts_into_inventory_error() {
        let err: InventoryError = ValidationError::empty(Field::Price).into();
        assert!(matches!(err, InventoryError::Validation(ref v) if v.field == Field::Price));
        assert_eq!(err.to_string(), "validation failed: price must not be empty");
    }
}
