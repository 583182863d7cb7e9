//! Input validation shared by every place a product is created or edited.
//!
//! All raw input is trimmed before it is checked. Each check reports the
//! first failing field as a [`ValidationError`].

use stockwidget_core::{Field, ProductCode, ValidationError, ValidationReason};

use crate::product::{ProductDraft, ProductRecord};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 40;
/// Longest accepted price input, in characters.
pub const MAX_PRICE_LEN: usize = 20;
/// Most digits accepted for a quantity.
pub const MAX_QUANTITY_DIGITS: usize = 4;
/// Longest accepted product code under the default rules.
pub const MAX_CODE_LEN: usize = 4;
/// Prices must stay below this (at most twenty integer digits).
pub const MAX_PRICE: f64 = 1e20;

/// Validation limits for product input.
///
/// `Default` matches the limits of the product forms: a digits-only code of up
/// to four characters, a 40-character name, a price of up to 20 characters and
/// a quantity of up to four digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub max_name_len: usize,
    pub max_price_len: usize,
    pub max_quantity_digits: usize,
    /// `None` lifts the length limit on codes.
    pub max_code_len: Option<usize>,
    pub code_digits_only: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_name_len: MAX_NAME_LEN,
            max_price_len: MAX_PRICE_LEN,
            max_quantity_digits: MAX_QUANTITY_DIGITS,
            max_code_len: Some(MAX_CODE_LEN),
            code_digits_only: true,
        }
    }
}

impl ValidationRules {
    /// Rules that only require a non-empty code.
    pub fn free_form_codes() -> Self {
        Self {
            max_code_len: None,
            code_digits_only: false,
            ..Self::default()
        }
    }

    pub fn code(&self, raw: &str) -> Result<ProductCode, ValidationError> {
        let code = ProductCode::parse(raw)?;
        if self.code_digits_only && !is_digits(code.as_str()) {
            return Err(ValidationError::new(Field::Code, ValidationReason::NotDigits));
        }
        if let Some(max) = self.max_code_len {
            if code.as_str().chars().count() > max {
                return Err(ValidationError::too_long(Field::Code, max));
            }
        }
        Ok(code)
    }

    pub fn name(&self, raw: &str) -> Result<String, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::empty(Field::Name));
        }
        if name.chars().count() > self.max_name_len {
            return Err(ValidationError::too_long(Field::Name, self.max_name_len));
        }
        Ok(name.to_string())
    }

    pub fn price(&self, raw: &str) -> Result<f64, ValidationError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ValidationError::empty(Field::Price));
        }
        if input.chars().count() > self.max_price_len {
            return Err(ValidationError::too_long(Field::Price, self.max_price_len));
        }
        // Plain decimal notation only: no exponent, sign prefix or `inf`/`NaN`.
        // A leading `-` is let through so it reports as `NotPositive`.
        let not_a_number = || ValidationError::new(Field::Price, ValidationReason::NotANumber);
        if !is_decimal(input.strip_prefix('-').unwrap_or(input)) {
            return Err(not_a_number());
        }
        let price: f64 = input.parse().map_err(|_| not_a_number())?;
        self.check_price(price)?;
        Ok(price)
    }

    pub fn quantity(&self, raw: &str) -> Result<u32, ValidationError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ValidationError::empty(Field::Quantity));
        }
        if let Some(rest) = input.strip_prefix('-') {
            if is_digits(rest) {
                return Err(ValidationError::new(Field::Quantity, ValidationReason::Negative));
            }
        }
        if !is_digits(input) {
            return Err(ValidationError::new(Field::Quantity, ValidationReason::NotDigits));
        }
        if input.len() > self.max_quantity_digits {
            return Err(ValidationError::too_long(
                Field::Quantity,
                self.max_quantity_digits,
            ));
        }
        input
            .parse()
            .map_err(|_| ValidationError::new(Field::Quantity, ValidationReason::OutOfRange))
    }

    /// Validate the add-product form. Fields are checked in form order.
    pub fn validate_new(&self, draft: &ProductDraft) -> Result<ProductRecord, ValidationError> {
        let code = self.code(&draft.code)?;
        self.validate_edit(&code, draft)
    }

    /// Validate the edit form of an existing product.
    ///
    /// The code is immutable after creation, so `draft.code` is ignored.
    pub fn validate_edit(
        &self,
        code: &ProductCode,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, ValidationError> {
        Ok(ProductRecord {
            code: code.clone(),
            name: self.name(&draft.name)?,
            price: self.price(&draft.price)?,
            quantity: self.quantity(&draft.quantity)?,
        })
    }

    /// Check an already-typed record against the record invariants.
    ///
    /// Code format is not re-checked: records may predate the current rules.
    pub fn check_record(&self, record: &ProductRecord) -> Result<(), ValidationError> {
        if record.code.as_str().trim().is_empty() {
            return Err(ValidationError::empty(Field::Code));
        }
        self.name(&record.name)?;
        self.check_price(record.price)
    }

    /// A valid price is finite, positive, below [`MAX_PRICE`], and renders
    /// back through [`format_price`] within `max_price_len`.
    fn check_price(&self, price: f64) -> Result<(), ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::new(Field::Price, ValidationReason::NotFinite));
        }
        if price <= 0.0 {
            return Err(ValidationError::new(Field::Price, ValidationReason::NotPositive));
        }
        if price >= MAX_PRICE {
            return Err(ValidationError::new(Field::Price, ValidationReason::OutOfRange));
        }
        if format_price(price).chars().count() > self.max_price_len {
            return Err(ValidationError::too_long(Field::Price, self.max_price_len));
        }
        Ok(())
    }
}

/// Price as it appears in an edit form: shortest exact decimal, no exponent,
/// no trailing `.0`.
pub fn format_price(price: f64) -> String {
    price.to_string()
}

/// Digits with at most one `.`, and at least one digit.
fn is_decimal(s: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for b in s.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::default()
    }

    fn reason_of(
        result: Result<impl core::fmt::Debug, ValidationError>,
    ) -> (Field, ValidationReason) {
        let err = result.unwrap_err();
        (err.field, err.reason)
    }

    #[test]
    fn empty_name_rejected() {
        assert_eq!(reason_of(rules().name("")), (Field::Name, ValidationReason::Empty));
        assert_eq!(reason_of(rules().name("   ")), (Field::Name, ValidationReason::Empty));
    }

    #[test]
    fn name_length_limit_counts_characters() {
        let forty = "ñ".repeat(40);
        assert_eq!(rules().name(&forty).unwrap(), forty);
        assert_eq!(
            reason_of(rules().name(&"a".repeat(41))),
            (Field::Name, ValidationReason::TooLong { max: 40 })
        );
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(rules().name("  Laptop ").unwrap(), "Laptop");
    }

    #[test]
    fn zero_price_rejected() {
        assert_eq!(reason_of(rules().price("0")), (Field::Price, ValidationReason::NotPositive));
        assert_eq!(reason_of(rules().price("0.00")), (Field::Price, ValidationReason::NotPositive));
    }

    #[test]
    fn negative_price_rejected() {
        assert_eq!(reason_of(rules().price("-5")), (Field::Price, ValidationReason::NotPositive));
    }

    #[test]
    fn malformed_price_rejected() {
        assert_eq!(reason_of(rules().price("1.2.3")), (Field::Price, ValidationReason::NotANumber));
        assert_eq!(reason_of(rules().price(".")), (Field::Price, ValidationReason::NotANumber));
        assert_eq!(reason_of(rules().price("abc")), (Field::Price, ValidationReason::NotANumber));
        assert_eq!(reason_of(rules().price("")), (Field::Price, ValidationReason::Empty));
    }

    #[test]
    fn price_must_be_plain_decimal() {
        for raw in ["1e5", "1E5", "2.5e3", "+5", "inf", "NaN", "1e308", "5-", "1,5"] {
            assert_eq!(
                reason_of(rules().price(raw)),
                (Field::Price, ValidationReason::NotANumber),
                "{raw}"
            );
        }
        assert_eq!(rules().price(".5").unwrap(), 0.5);
        assert_eq!(rules().price("5.").unwrap(), 5.0);
    }

    #[test]
    fn non_finite_record_price_rejected() {
        let mut record = ProductRecord {
            code: ProductCode::parse("1").unwrap(),
            name: "Gold".to_string(),
            price: f64::INFINITY,
            quantity: 1,
        };
        assert_eq!(
            reason_of(rules().check_record(&record)),
            (Field::Price, ValidationReason::NotFinite)
        );

        record.price = 1e308;
        assert_eq!(
            reason_of(rules().check_record(&record)),
            (Field::Price, ValidationReason::OutOfRange)
        );

        record.price = 1e-30;
        assert_eq!(
            reason_of(rules().check_record(&record)),
            (Field::Price, ValidationReason::TooLong { max: 20 })
        );
    }

    #[test]
    fn twenty_digit_prices_stop_below_max() {
        // Rounds up to exactly 1e20 as an f64.
        assert_eq!(
            reason_of(rules().price(&"9".repeat(20))),
            (Field::Price, ValidationReason::OutOfRange)
        );

        let price = rules().price("12345678901234567890").unwrap();
        assert!(price < MAX_PRICE);
        assert_eq!(format_price(price), "12345678901234567000");
    }

    #[test]
    fn price_accepts_decimal_point() {
        assert_eq!(rules().price(" 2500000.00 ").unwrap(), 2_500_000.0);
        assert_eq!(rules().price("0.5").unwrap(), 0.5);
    }

    #[test]
    fn overlong_price_rejected() {
        assert_eq!(
            reason_of(rules().price(&"9".repeat(21))),
            (Field::Price, ValidationReason::TooLong { max: 20 })
        );
    }

    #[test]
    fn negative_quantity_rejected() {
        assert_eq!(
            reason_of(rules().quantity("-1")),
            (Field::Quantity, ValidationReason::Negative)
        );
    }

    #[test]
    fn zero_quantity_accepted() {
        assert_eq!(rules().quantity("0").unwrap(), 0);
    }

    #[test]
    fn quantity_must_be_whole_digits() {
        assert_eq!(
            reason_of(rules().quantity("1.5")),
            (Field::Quantity, ValidationReason::NotDigits)
        );
        assert_eq!(
            reason_of(rules().quantity("12345")),
            (Field::Quantity, ValidationReason::TooLong { max: 4 })
        );
        assert_eq!(rules().quantity("9999").unwrap(), 9999);
    }

    #[test]
    fn code_defaults_to_four_digits() {
        assert_eq!(rules().code("0001").unwrap().as_str(), "0001");
        assert_eq!(reason_of(rules().code("")), (Field::Code, ValidationReason::Empty));
        assert_eq!(reason_of(rules().code("A1")), (Field::Code, ValidationReason::NotDigits));
        assert_eq!(
            reason_of(rules().code("12345")),
            (Field::Code, ValidationReason::TooLong { max: 4 })
        );
    }

    #[test]
    fn free_form_codes_only_require_content() {
        let rules = ValidationRules::free_form_codes();
        assert_eq!(rules.code("SKU-ABC-123").unwrap().as_str(), "SKU-ABC-123");
        assert_eq!(reason_of(rules.code(" ")), (Field::Code, ValidationReason::Empty));
    }

    #[test]
    fn validate_new_builds_trimmed_record() {
        let draft = ProductDraft::new(" 001 ", " Laptop ", "2500000.00", " 5");
        let record = rules().validate_new(&draft).unwrap();
        assert_eq!(record.code.as_str(), "001");
        assert_eq!(record.name, "Laptop");
        assert_eq!(record.price, 2_500_000.0);
        assert_eq!(record.quantity, 5);
    }

    #[test]
    fn validate_new_reports_first_failing_field() {
        let draft = ProductDraft::new("001", "", "0", "-1");
        assert_eq!(reason_of(rules().validate_new(&draft)), (Field::Name, ValidationReason::Empty));
    }

    #[test]
    fn validate_edit_ignores_draft_code() {
        let code = ProductCode::parse("001").unwrap();
        let draft = ProductDraft::new("not a code", "Laptop", "10", "3");
        let record = rules().validate_edit(&code, &draft).unwrap();
        assert_eq!(record.code, code);
    }

    #[test]
    fn check_record_skips_code_format() {
        let record = ProductRecord {
            code: ProductCode::from_stored("LEGACY-1".to_string()),
            name: "Cable".to_string(),
            price: 3.0,
            quantity: 1,
        };
        assert!(rules().check_record(&record).is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any 1-4 digit code, sane name, positive price and
            /// 0-9999 quantity validates and survives the round trip unchanged.
            #[test]
            fn valid_drafts_always_accepted(
                code in "[0-9]{1,4}",
                name in "[A-Za-z][A-Za-z0-9 ]{0,38}[A-Za-z0-9]",
                cents in 1u64..1_000_000_000,
                quantity in 0u32..10_000,
            ) {
                let price = format!("{}.{:02}", cents / 100, cents % 100);
                let draft = ProductDraft::new(
                    code.clone(),
                    name.clone(),
                    price.clone(),
                    quantity.to_string(),
                );
                let record = ValidationRules::default().validate_new(&draft).unwrap();
                prop_assert_eq!(record.code.as_str(), code.as_str());
                prop_assert_eq!(&record.name, &name);
                prop_assert_eq!(record.price, price.parse::<f64>().unwrap());
                prop_assert_eq!(record.quantity, quantity);
            }

            /// Property: an accepted price renders back into a form value that
            /// fits the field and parses to the same number.
            #[test]
            fn accepted_price_reloads_unchanged(
                raw in prop_oneof!["[0-9]{1,20}", "[0-9]{1,12}\\.[0-9]{0,7}", "\\.[0-9]{1,19}"],
            ) {
                let rules = ValidationRules::default();
                if let Ok(price) = rules.price(&raw) {
                    let text = format_price(price);
                    prop_assert!(text.chars().count() <= MAX_PRICE_LEN, "{} -> {}", raw, text);
                    prop_assert_eq!(rules.price(&text).unwrap(), price);
                }
            }

            /// Property: negative quantities never validate.
            #[test]
            fn negative_quantities_rejected(q in 1u32..10_000) {
                let err = ValidationRules::default().quantity(&format!("-{q}")).unwrap_err();
                prop_assert_eq!(err.field, Field::Quantity);
            }
        }
    }
}
