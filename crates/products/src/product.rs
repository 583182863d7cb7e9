use serde::{Deserialize, Serialize};

use stockwidget_core::{Entity, ProductCode, ValidationError};

use crate::validation::{ValidationRules, format_price};

/// One product row as the store persists it.
///
/// The surrogate row id is deliberately absent: callers address records by
/// `code` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: ProductCode,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl ProductRecord {
    /// Build a record from typed values, checking the record invariants.
    pub fn new(
        code: ProductCode,
        name: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            code,
            name: name.into(),
            price,
            quantity,
        };
        record.check()?;
        Ok(record)
    }

    /// Re-check name/price/code invariants with the default rules.
    pub fn check(&self) -> Result<(), ValidationError> {
        ValidationRules::default().check_record(self)
    }

    /// Value of this line of stock (`price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Copy of this record with the editable fields replaced. The code is kept.
    pub fn with_changes(&self, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            code: self.code.clone(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

impl Entity for ProductRecord {
    type Id = ProductCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Raw form input for a product, exactly as typed.
///
/// Run it through [`ValidationRules`] to obtain a [`ProductRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub code: String,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

impl ProductDraft {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Pre-fill an edit form from a stored record.
    ///
    /// Whole prices render without a fractional part (`2500000`, not `2500000.0`).
    /// A record that passed validation always reloads within the price field's
    /// length limit.
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            code: record.code.to_string(),
            name: record.name.clone(),
            price: format_price(record.price),
            quantity: record.quantity.to_string(),
        }
    }

    /// Whether every field has some non-blank content (the "save enabled" check).
    pub fn is_complete(&self) -> bool {
        [&self.code, &self.name, &self.price, &self.quantity]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}
