//! Currency formatting for the balance line.

use num_format::{Locale, ToFormattedString};
use thiserror::Error;

pub const CURRENCY_SYMBOL: &str = "$";

/// `.` between three-digit groups, the same grouping es-CO uses. Only the
/// integer part goes through it; the `,` decimal mark is added here.
const THOUSANDS: Locale = Locale::de;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MoneyError {
    #[error("amount {0} is not a finite number")]
    NotFinite(f64),

    #[error("amount {0} is too large to display")]
    TooLarge(f64),
}

/// Format an amount as `$ 12.500.000,00`: `.` groups thousands, `,` precedes
/// exactly two decimals. Rounds to the cent from the exact binary value.
pub fn format_currency(amount: f64) -> Result<String, MoneyError> {
    if !amount.is_finite() {
        return Err(MoneyError::NotFinite(amount));
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let whole: u128 = whole.parse().map_err(|_| MoneyError::TooLarge(amount))?;

    let sign = if amount < 0.0 && (whole > 0 || fraction != "00") { "-" } else { "" };
    let grouped = whole.to_formatted_string(&THOUSANDS);

    Ok(format!("{CURRENCY_SYMBOL} {sign}{grouped},{fraction}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(amount: f64) -> String {
        format_currency(amount).unwrap()
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(fmt(12_500_000.0), "$ 12.500.000,00");
        assert_eq!(fmt(7_500_000.0), "$ 7.500.000,00");
        assert_eq!(fmt(1_000.0), "$ 1.000,00");
    }

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(fmt(0.0), "$ 0,00");
        assert_eq!(fmt(999.5), "$ 999,50");
        assert_eq!(fmt(3.0), "$ 3,00");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(fmt(91.0 + 0.126), "$ 91,13");
        assert_eq!(fmt(0.004), "$ 0,00");
        assert_eq!(fmt(1_234.999), "$ 1.235,00");
    }

    #[test]
    fn negative_zero_prints_unsigned() {
        assert_eq!(fmt(-0.0), "$ 0,00");
        assert_eq!(fmt(-0.001), "$ 0,00");
        assert_eq!(fmt(-1_500.25), "$ -1.500,25");
    }

    #[test]
    fn largest_form_price_times_max_quantity() {
        let price: f64 = "12345678901234567890".parse().unwrap();
        assert_eq!(fmt(price * 9999.0), "$ 123.444.443.333.444.436.492.288,00");
        assert_eq!(fmt(1e20 * 9999.0), "$ 999.900.000.000.000.034.603.008,00");
    }

    #[test]
    fn past_u64_range_is_not_truncated() {
        assert_eq!(fmt(2f64.powi(70)), "$ 1.180.591.620.717.411.303.424,00");
    }

    #[test]
    fn non_finite_and_huge_amounts_are_errors() {
        assert!(matches!(format_currency(f64::INFINITY), Err(MoneyError::NotFinite(_))));
        assert!(matches!(format_currency(f64::NAN), Err(MoneyError::NotFinite(_))));
        assert_eq!(format_currency(1e300), Err(MoneyError::TooLarge(1e300)));
    }
}
