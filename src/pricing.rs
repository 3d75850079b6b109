//! Pricing
//!
//! Subtotal, discount and total for a booking quote.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{add_ons::AddOnLineItem, vouchers::Voucher};

/// Errors that can occur while pricing a booking.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A price, fixed discount or payment was below zero (minor units).
    #[error("amount must not be negative, got {0} minor units")]
    NegativeAmount(i64),

    /// A percentage discount was below zero.
    #[error("percentage discount must not be negative")]
    NegativePercentage,

    /// Minor-unit arithmetic overflowed.
    #[error("amount overflowed while pricing")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// An amount is in a different currency than the quote (found, expected).
    #[error("amount has currency {0}, but the quote is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A manually entered discount value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManualDiscount<'a> {
    /// A share of the subtotal, e.g. 10% off.
    Percentage(Percentage),

    /// A fixed amount off the subtotal.
    Fixed(Money<'a, Currency>),
}

impl ManualDiscount<'_> {
    /// Build a percentage discount from percentage points (`10` means 10% off).
    pub fn percent(points: Decimal) -> Self {
        ManualDiscount::Percentage(Percentage::from(points / Decimal::ONE_HUNDRED))
    }
}

/// The discount applied to a booking. A booking carries at most one.
#[derive(Debug, Clone, PartialEq)]
pub enum Discount<'a> {
    /// A catalog voucher. Its amount follows the subtotal and drops to zero below the voucher's
    /// minimum purchase.
    Voucher(Voucher<'a>),

    /// A discount entered by staff.
    Manual {
        /// Percentage or fixed value.
        value: ManualDiscount<'a>,

        /// Free-text justification.
        reason: String,
    },
}

impl Discount<'_> {
    /// Short description for receipts, e.g. `Voucher WELCOME10`.
    pub fn describe(&self) -> String {
        match self {
            Discount::Voucher(voucher) => format!("Voucher {}", voucher.code),
            Discount::Manual { reason, .. } if reason.trim().is_empty() => {
                "Manual discount".to_string()
            }
            Discount::Manual { reason, .. } => format!("Manual discount ({})", reason.trim()),
        }
    }
}

/// Price breakdown for a booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote<'a> {
    add_ons_total: Money<'a, Currency>,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Quote<'a> {
    /// Sum of all add-on line items.
    pub fn add_ons_total(&self) -> Money<'a, Currency> {
        self.add_ons_total
    }

    /// Package price plus add-ons.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount amount as calculated, before clamping the total.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable. Never negative.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Calculates subtotal, discount and total for a booking.
///
/// `subtotal = package_price + Σ(quantity × unit_price)` and `total = max(0, subtotal - discount)`.
///
/// # Errors
///
/// - [`PricingError::NegativeAmount`]: the package price or a fixed discount is negative.
/// - [`PricingError::NegativePercentage`]: a percentage discount is negative.
/// - [`PricingError::Overflow`]: minor-unit arithmetic overflowed.
/// - [`PricingError::PercentConversion`]: a percentage could not be applied safely.
/// - [`PricingError::CurrencyMismatch`]: the amounts are not all in the same currency.
pub fn compute_total<'a>(
    package_price: Money<'a, Currency>,
    add_ons: &[AddOnLineItem<'a>],
    discount: Option<&Discount<'a>>,
) -> Result<Quote<'a>, PricingError> {
    ensure_non_negative(&package_price)?;

    let currency = package_price.currency();
    let add_ons_total = add_ons_total(add_ons, currency)?;
    let subtotal = package_price.add(add_ons_total)?;

    let discount = match discount {
        Some(discount) => discount_amount(discount, &subtotal)?,
        None => Money::from_minor(0, currency),
    };

    let remaining = subtotal.sub(discount)?;

    let total = if remaining.to_minor_units() < 0 {
        Money::from_minor(0, currency)
    } else {
        remaining
    };

    Ok(Quote {
        add_ons_total,
        subtotal,
        discount,
        total,
    })
}

/// Sums the subtotals of the given add-ons. An empty list sums to zero.
///
/// # Errors
///
/// Returns an error if a line item overflows or is in another currency.
pub fn add_ons_total<'a>(
    add_ons: &[AddOnLineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    add_ons
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            let subtotal = item.subtotal()?;

            ensure_same_currency(&subtotal, currency)?;

            Ok(acc.add(subtotal)?)
        })
}

/// Resolves the discount amount for a subtotal.
///
/// # Errors
///
/// Returns an error if the discount is negative, in another currency, or cannot be converted.
pub fn discount_amount<'a>(
    discount: &Discount<'a>,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let amount = match discount {
        Discount::Voucher(voucher) => voucher.amount_or_zero(subtotal)?,
        Discount::Manual {
            value: ManualDiscount::Fixed(amount),
            ..
        } => *amount,
        Discount::Manual {
            value: ManualDiscount::Percentage(percent),
            ..
        } => percent_of(percent, subtotal)?,
    };

    ensure_non_negative(&amount)?;

    ensure_same_currency(&amount, subtotal.currency())?;

    Ok(amount)
}

/// Applies a percentage to an amount, rounding half away from zero to the minor unit.
///
/// # Errors
///
/// Returns an error if the percentage is negative or the result cannot be represented.
pub fn percent_of<'a>(
    percent: &Percentage,
    amount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    if (*percent) * Decimal::ONE < Decimal::ZERO {
        return Err(PricingError::NegativePercentage);
    }

    let minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Calculate a percentage of a minor unit amount.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

pub(crate) fn ensure_same_currency(
    amount: &Money<'_, Currency>,
    currency: &Currency,
) -> Result<(), PricingError> {
    if amount.currency() == currency {
        Ok(())
    } else {
        Err(PricingError::CurrencyMismatch(
            amount.currency().iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

pub(crate) fn ensure_non_negative(amount: &Money<'_, Currency>) -> Result<(), PricingError> {
    let minor = amount.to_minor_units();

    if minor < 0 {
        Err(PricingError::NegativeAmount(minor))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{IDR, USD};
    use testresult::TestResult;

    use super::*;
    use crate::vouchers::VoucherKind;

    fn idr(major: i64) -> Money<'static, Currency> {
        Money::from_minor(major * 10_i64.pow(IDR.exponent), IDR)
    }

    fn welcome10() -> Voucher<'static> {
        Voucher::new("WELCOME10", VoucherKind::Percentage(Percentage::from(Decimal::new(10, 2))))
    }

    #[test]
    fn subtotal_adds_package_and_add_ons() -> TestResult {
        let add_ons = [AddOnLineItem::custom("Extra print", 2, idr(50_000))?];

        let quote = compute_total(idr(500_000), &add_ons, None)?;

        assert_eq!(quote.add_ons_total(), idr(100_000));
        assert_eq!(quote.subtotal(), idr(600_000));
        assert_eq!(quote.discount(), idr(0));
        assert_eq!(quote.total(), idr(600_000));

        Ok(())
    }

    #[test]
    fn voucher_discount_is_subtracted() -> TestResult {
        let add_ons = [AddOnLineItem::custom("Extra print", 2, idr(50_000))?];
        let discount = Discount::Voucher(welcome10());

        let quote = compute_total(idr(500_000), &add_ons, Some(&discount))?;

        assert_eq!(quote.subtotal(), idr(600_000));
        assert_eq!(quote.discount(), idr(60_000));
        assert_eq!(quote.total(), idr(540_000));

        Ok(())
    }

    #[test]
    fn voucher_below_minimum_purchase_discounts_nothing() -> TestResult {
        let discount = Discount::Voucher(
            Voucher::new("FLAT50K", VoucherKind::Fixed(idr(50_000)))
                .with_min_purchase(idr(300_000)),
        );

        let below = compute_total(idr(200_000), &[], Some(&discount))?;
        let at = compute_total(idr(300_000), &[], Some(&discount))?;

        assert_eq!(below.discount(), idr(0));
        assert_eq!(below.total(), idr(200_000));
        assert_eq!(at.discount(), idr(50_000));

        Ok(())
    }

    #[test]
    fn manual_percentage_uses_subtotal() -> TestResult {
        let add_ons = [AddOnLineItem::custom("Makeup", 1, idr(150_000))?];
        let discount = Discount::Manual {
            value: ManualDiscount::percent(Decimal::from(20)),
            reason: "Returning client".to_string(),
        };

        let quote = compute_total(idr(850_000), &add_ons, Some(&discount))?;

        assert_eq!(quote.discount(), idr(200_000));
        assert_eq!(quote.total(), idr(800_000));

        Ok(())
    }

    #[test]
    fn oversized_fixed_discount_clamps_total_to_zero() -> TestResult {
        let discount = Discount::Manual {
            value: ManualDiscount::Fixed(idr(100_000)),
            reason: "Complimentary".to_string(),
        };

        let quote = compute_total(idr(0), &[], Some(&discount))?;

        assert_eq!(quote.subtotal(), idr(0));
        assert_eq!(quote.discount(), idr(100_000));
        assert_eq!(quote.total(), idr(0));

        Ok(())
    }

    #[test]
    fn percentage_above_one_hundred_clamps_total_to_zero() -> TestResult {
        let discount = Discount::Manual {
            value: ManualDiscount::percent(Decimal::from(150)),
            reason: String::new(),
        };

        let quote = compute_total(idr(200_000), &[], Some(&discount))?;

        assert_eq!(quote.total(), idr(0));

        Ok(())
    }

    #[test]
    fn empty_add_ons_total_zero() -> TestResult {
        assert_eq!(add_ons_total(&[], IDR)?, idr(0));

        Ok(())
    }

    #[test]
    fn negative_package_price_is_rejected() {
        let result = compute_total(idr(-1), &[], None);

        assert!(matches!(result, Err(PricingError::NegativeAmount(_))));
    }

    #[test]
    fn negative_percentage_is_rejected() {
        let discount = Discount::Manual {
            value: ManualDiscount::percent(Decimal::from(-10)),
            reason: String::new(),
        };

        let result = compute_total(idr(100_000), &[], Some(&discount));

        assert_eq!(result, Err(PricingError::NegativePercentage));
    }

    #[test]
    fn discount_in_another_currency_is_rejected() {
        let discount = Discount::Manual {
            value: ManualDiscount::Fixed(Money::from_minor(500, USD)),
            reason: String::new(),
        };

        let result = compute_total(idr(100_000), &[], Some(&discount));

        assert_eq!(result, Err(PricingError::CurrencyMismatch("USD", "IDR")));
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        let percent = Percentage::from(0.5);

        assert_eq!(percent_of_minor(&percent, 3)?, 2);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(PricingError::PercentConversion)));
    }

    #[test]
    fn describe_names_the_discount_source() {
        let voucher = Discount::Voucher(welcome10());
        let manual = Discount::Manual {
            value: ManualDiscount::Fixed(idr(1)),
            reason: " Family rate ".to_string(),
        };

        assert_eq!(voucher.describe(), "Voucher WELCOME10");
        assert_eq!(manual.describe(), "Manual discount (Family rate)");
    }
}
