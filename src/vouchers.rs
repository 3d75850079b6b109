//! Vouchers
//!
//! A catalog of discount codes. Resolving a code checks its validity window and minimum purchase
//! and produces the discount amount for a given subtotal. A rejected voucher never applies
//! partially.

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::pricing::{
    Discount, PricingError, ensure_non_negative, ensure_same_currency, percent_of,
};

/// Reasons a voucher code cannot be applied.
#[derive(Debug, Error, PartialEq)]
pub enum VoucherError {
    /// No voucher with this code exists.
    #[error("invalid voucher: {0} not found")]
    NotFound(String),

    /// The voucher's validity window has not started.
    #[error("invalid voucher: {code} is not valid before {valid_from}")]
    NotYetValid {
        /// Voucher code.
        code: String,

        /// First valid day.
        valid_from: Date,
    },

    /// The voucher's validity window has ended.
    #[error("invalid voucher: {code} expired on {valid_until}")]
    Expired {
        /// Voucher code.
        code: String,

        /// Last valid day.
        valid_until: Date,
    },

    /// The subtotal is below the voucher's minimum purchase.
    #[error("invalid voucher: {code} requires a minimum purchase of {minimum}, subtotal is {subtotal}")]
    BelowMinimumPurchase {
        /// Voucher code.
        code: String,

        /// Required minimum, formatted.
        minimum: String,

        /// Subtotal the voucher was checked against, formatted.
        subtotal: String,
    },

    /// The voucher amount could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How a voucher discounts the subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoucherKind<'a> {
    /// Fixed amount off.
    Fixed(Money<'a, Currency>),

    /// Share of the subtotal off.
    Percentage(Percentage),
}

/// A voucher catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Voucher<'a> {
    /// Code customers enter. Stored upper-case.
    pub code: String,

    /// Discount type and value.
    pub kind: VoucherKind<'a>,

    /// Subtotal required for the voucher to apply.
    pub min_purchase: Option<Money<'a, Currency>>,

    /// First valid day, inclusive.
    pub valid_from: Option<Date>,

    /// Last valid day, inclusive.
    pub valid_until: Option<Date>,
}

impl<'a> Voucher<'a> {
    /// Creates a voucher with no minimum purchase and no validity window.
    pub fn new(code: &str, kind: VoucherKind<'a>) -> Self {
        Self {
            code: normalise_code(code),
            kind,
            min_purchase: None,
            valid_from: None,
            valid_until: None,
        }
    }

    /// Sets the minimum purchase.
    #[must_use]
    pub fn with_min_purchase(mut self, min_purchase: Money<'a, Currency>) -> Self {
        self.min_purchase = Some(min_purchase);
        self
    }

    /// Sets the validity window. Either end may be open.
    #[must_use]
    pub fn with_validity(mut self, valid_from: Option<Date>, valid_until: Option<Date>) -> Self {
        self.valid_from = valid_from;
        self.valid_until = valid_until;
        self
    }

    /// Checks the validity window for `on`.
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::NotYetValid`] or [`VoucherError::Expired`].
    pub fn check_validity(&self, on: Date) -> Result<(), VoucherError> {
        if let Some(valid_from) = self.valid_from
            && on < valid_from
        {
            return Err(VoucherError::NotYetValid {
                code: self.code.clone(),
                valid_from,
            });
        }

        if let Some(valid_until) = self.valid_until
            && on > valid_until
        {
            return Err(VoucherError::Expired {
                code: self.code.clone(),
                valid_until,
            });
        }

        Ok(())
    }

    /// Whether `subtotal` reaches the minimum purchase. The gate is inclusive.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the minimum is in another currency.
    pub fn meets_min_purchase(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<bool, PricingError> {
        let Some(minimum) = &self.min_purchase else {
            return Ok(true);
        };

        ensure_same_currency(minimum, subtotal.currency())?;

        Ok(subtotal.to_minor_units() >= minimum.to_minor_units())
    }

    /// Discount amount for `subtotal`, gated by the minimum purchase.
    ///
    /// # Errors
    ///
    /// Returns [`VoucherError::BelowMinimumPurchase`] when the subtotal is too low, or a pricing
    /// error when the amount cannot be calculated.
    pub fn amount_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, VoucherError> {
        if !self.meets_min_purchase(subtotal)? {
            return Err(self.below_minimum(subtotal));
        }

        Ok(self.value_for(subtotal)?)
    }

    /// Discount amount for `subtotal`, or zero below the minimum purchase.
    ///
    /// # Errors
    ///
    /// Returns a pricing error when the amount cannot be calculated.
    pub fn amount_or_zero(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        if self.meets_min_purchase(subtotal)? {
            self.value_for(subtotal)
        } else {
            Ok(Money::from_minor(0, subtotal.currency()))
        }
    }

    pub(crate) fn below_minimum(&self, subtotal: &Money<'a, Currency>) -> VoucherError {
        VoucherError::BelowMinimumPurchase {
            code: self.code.clone(),
            minimum: self
                .min_purchase
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            subtotal: subtotal.to_string(),
        }
    }

    fn value_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        match &self.kind {
            VoucherKind::Fixed(amount) => {
                ensure_non_negative(amount)?;
                ensure_same_currency(amount, subtotal.currency())?;

                Ok(*amount)
            }
            VoucherKind::Percentage(percent) => percent_of(percent, subtotal),
        }
    }
}

/// A voucher resolved against a subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVoucher<'a> {
    /// The catalog voucher.
    pub voucher: Voucher<'a>,

    /// Discount amount for the subtotal it was resolved against.
    pub amount: Money<'a, Currency>,
}

impl<'a> ResolvedVoucher<'a> {
    /// Turns the resolved voucher into a booking discount. The booking recalculates the amount
    /// whenever its subtotal changes.
    pub fn into_discount(self) -> Discount<'a> {
        Discount::Voucher(self.voucher)
    }
}

/// Voucher lookup by code. Codes are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct VoucherCatalog<'a> {
    vouchers: FxHashMap<String, Voucher<'a>>,
}

impl<'a> VoucherCatalog<'a> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a voucher, returning any voucher it replaced.
    pub fn insert(&mut self, voucher: Voucher<'a>) -> Option<Voucher<'a>> {
        self.vouchers.insert(normalise_code(&voucher.code), voucher)
    }

    /// Looks up a voucher.
    pub fn get(&self, code: &str) -> Option<&Voucher<'a>> {
        self.vouchers.get(&normalise_code(code))
    }

    /// Number of vouchers.
    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    /// Resolves `code` for `subtotal` on day `on`.
    ///
    /// # Errors
    ///
    /// Returns a [`VoucherError`] if the code is unknown, outside its validity window, below its
    /// minimum purchase, or cannot be priced.
    pub fn resolve(
        &self,
        code: &str,
        subtotal: &Money<'a, Currency>,
        on: Date,
    ) -> Result<ResolvedVoucher<'a>, VoucherError> {
        let voucher = self
            .get(code)
            .ok_or_else(|| VoucherError::NotFound(normalise_code(code)))?;

        voucher.check_validity(on)?;

        let amount = voucher.amount_for(subtotal)?;

        debug!(code = %voucher.code, %amount, "voucher resolved");

        Ok(ResolvedVoucher {
            voucher: voucher.clone(),
            amount,
        })
    }

    /// Resolves `code`, falling back to a zero discount alongside the rejection.
    pub fn resolve_or_zero(
        &self,
        code: &str,
        subtotal: &Money<'a, Currency>,
        on: Date,
    ) -> (Money<'a, Currency>, Option<VoucherError>) {
        match self.resolve(code, subtotal, on) {
            Ok(resolved) => (resolved.amount, None),
            Err(err) => {
                debug!(code, error = %err, "voucher rejected");

                (Money::from_minor(0, subtotal.currency()), Some(err))
            }
        }
    }
}

impl<'a> FromIterator<Voucher<'a>> for VoucherCatalog<'a> {
    fn from_iter<I: IntoIterator<Item = Voucher<'a>>>(iter: I) -> Self {
        let mut catalog = Self::new();

        for voucher in iter {
            catalog.insert(voucher);
        }

        catalog
    }
}

fn normalise_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
