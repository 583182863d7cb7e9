//! Inventory balance: the total value of stock on hand.
//!
//! Derived on demand from the records; nothing here is stored. Formatting for
//! display (currency grouping, two decimals) is the caller's concern.

use serde::Serialize;

use crate::product::ProductRecord;

/// Computes the aggregate value of a set of product records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Σ `price * quantity` over `records`. Zero for no records; no rounding.
    pub fn total_value<'a, I>(records: I) -> f64
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        // Explicit +0.0 seed: `Sum for f64` starts from -0.0.
        records
            .into_iter()
            .fold(0.0, |acc, record| acc + record.line_total())
    }

    /// Counts and totals in a single pass.
    pub fn summarize<'a, I>(records: I) -> BalanceSummary
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        records
            .into_iter()
            .fold(BalanceSummary::default(), |mut summary, record| {
                summary.product_count += 1;
                summary.total_quantity += u64::from(record.quantity);
                summary.total_value += record.line_total();
                summary
            })
    }
}

/// Summary of the whole inventory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BalanceSummary {
    pub product_count: usize,
    pub total_quantity: u64,
    pub total_value: f64,
}

impl BalanceSummary {
    pub fn is_empty(&self) -> bool {
        self.product_count == 0
    }
}
