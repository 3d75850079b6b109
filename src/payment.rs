//! Payment status
//!
//! The payment status is derived, never set directly. It is recomputed after every pricing
//! mutation and whenever a payment is recorded.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, ensure_non_negative, ensure_same_currency},
    status::PaymentStatus,
};

/// Raised when a settled booking's total changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentWarning<'a> {
    /// Total the client paid against.
    pub previous_total: Money<'a, Currency>,

    /// Total after the change.
    pub new_total: Money<'a, Currency>,
}

impl fmt::Display for PaymentWarning<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total changed from {} to {} after payment was settled; payment is now partially paid",
            self.previous_total, self.new_total
        )
    }
}

/// Outcome of recomputing the payment status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentUpdate<'a> {
    /// The status to store.
    pub status: PaymentStatus,

    /// Set when the actor should be told that a settled booking needs attention.
    pub warning: Option<PaymentWarning<'a>>,
}

impl PaymentUpdate<'_> {
    /// Whether the status differs from `previous`.
    pub fn changed_from(&self, previous: PaymentStatus) -> bool {
        self.status != previous
    }
}

/// Recomputes the payment status after a pricing change.
///
/// A `PAID` booking whose total moves drops to `PARTIALLY_PAID` with a warning. Every other
/// combination keeps the previous status.
pub fn recompute_payment_status<'a>(
    previous: PaymentStatus,
    old_total: &Money<'a, Currency>,
    new_total: &Money<'a, Currency>,
) -> PaymentUpdate<'a> {
    let unchanged = old_total.currency() == new_total.currency()
        && old_total.to_minor_units() == new_total.to_minor_units();

    if previous == PaymentStatus::Paid && !unchanged {
        return PaymentUpdate {
            status: PaymentStatus::PartiallyPaid,
            warning: Some(PaymentWarning {
                previous_total: *old_total,
                new_total: *new_total,
            }),
        };
    }

    PaymentUpdate {
        status: previous,
        warning: None,
    }
}

/// Derives the payment status from the amount received so far.
///
/// Anything covering the total (including a zero total) is `PAID`; nothing received is
/// `UNPAID`; anything in between is `PARTIALLY_PAID`.
///
/// # Errors
///
/// Returns an error if `amount_paid` is negative or in another currency than `total`.
pub fn payment_status_for(
    amount_paid: &Money<'_, Currency>,
    total: &Money<'_, Currency>,
) -> Result<PaymentStatus, PricingError> {
    ensure_non_negative(amount_paid)?;
    ensure_same_currency(amount_paid, total.currency())?;

    let paid = amount_paid.to_minor_units();

    let status = if paid >= total.to_minor_units() {
        PaymentStatus::Paid
    } else if paid == 0 {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::PartiallyPaid
    };

    Ok(status)
}
