//! Products domain module.
//!
//! The persisted product record, the input validation contract shared by every
//! screen that creates or edits a product, and the derived inventory balance.
//! Pure domain logic (no IO, no storage).

pub mod balance;
pub mod product;
pub mod validation;

pub use balance::{BalanceCalculator, BalanceSummary};
pub use product::{ProductDraft, ProductRecord};
pub use validation::{
    MAX_CODE_LEN, MAX_NAME_LEN, MAX_PRICE, MAX_PRICE_LEN, MAX_QUANTITY_DIGITS, ValidationRules,
    format_price,
};
