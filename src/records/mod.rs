//! Records
//!
//! Serialisable snapshots exchanged with the persistence layer. Statuses and prices travel as
//! strings (`"PHOTOS_DELIVERED"`, `"500000 IDR"`) and are checked when converted into domain
//! types, so an unknown status never gets past this boundary.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{AUD, Currency, EUR, GBP, IDR, MYR, SGD, USD},
};
use thiserror::Error;

use crate::{
    booking::BookingError, identity::IdentityError, pricing::PricingError,
    status::UnknownStatusError,
};

pub mod add_ons;
pub mod booking;
pub mod vouchers;

/// Errors converting records into domain values.
#[derive(Debug, Error)]
pub enum RecordError {
    /// JSON (de)serialisation failed.
    #[error("invalid JSON record: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialisation failed.
    #[error("invalid YAML record: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A record mixes currencies.
    #[error("currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// A status string is not recognised.
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatusError),

    /// A manual discount must carry exactly one of `percentage` or `fixed`.
    #[error("manual discount must set exactly one of percentage or fixed")]
    InvalidDiscount,

    /// Code or slug is malformed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The record describes an impossible booking.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The record's amounts cannot be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Looks up a supported ISO currency by code.
///
/// # Errors
///
/// Returns [`RecordError::UnknownCurrency`] for codes the studio does not trade in.
pub fn currency_for(code: &str) -> Result<&'static Currency, RecordError> {
    let currency = match code.trim() {
        "IDR" => IDR,
        "USD" => USD,
        "SGD" => SGD,
        "MYR" => MYR,
        "AUD" => AUD,
        "EUR" => EUR,
        "GBP" => GBP,
        other => return Err(RecordError::UnknownCurrency(other.to_string())),
    };

    Ok(currency)
}

/// Parses a price such as `"500000 IDR"` or `"12.50 USD"`.
///
/// # Errors
///
/// Returns an error if the string is not `AMOUNT CURRENCY`, the amount has more precision than
/// the currency allows, or the currency is unknown.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, RecordError> {
    let invalid = || RecordError::InvalidPrice(s.to_string());

    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let amount = amount.parse::<Decimal>().map_err(|_err| invalid())?;
    let currency = currency_for(code)?;

    let scaled = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .ok_or_else(invalid)?;

    if !scaled.fract().is_zero() {
        return Err(invalid());
    }

    let minor_units = scaled.to_i64().ok_or_else(invalid)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Formats a price the way [`parse_price`] reads it, e.g. `"500000 IDR"`.
pub fn format_price(money: &Money<'_, Currency>) -> String {
    let currency = money.currency();
    let amount = Decimal::new(money.to_minor_units(), currency.exponent).normalize();

    format!("{amount} {}", currency.iso_alpha_code)
}

/// Parses a price and checks it is in `currency`.
///
/// # Errors
///
/// Returns [`RecordError::CurrencyMismatch`] for prices in another currency.
pub fn parse_price_in(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, RecordError> {
    let price = parse_price(s)?;

    if price.currency() != currency {
        return Err(RecordError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price.currency().iso_alpha_code.to_string(),
        ));
    }

    Ok(price)
}

/// Parses a percentage such as `"15%"` or `"0.15"`.
///
/// # Errors
///
/// Returns [`RecordError::InvalidPercentage`] if the value is not a number.
pub fn parse_percentage(s: &str) -> Result<Percentage, RecordError> {
    let trimmed = s.trim();
    let invalid = || RecordError::InvalidPercentage(s.to_string());

    if let Some(points) = trimmed.strip_suffix('%') {
        let points = points.trim().parse::<Decimal>().map_err(|_err| invalid())?;

        Ok(Percentage::from(points / Decimal::ONE_HUNDRED))
    } else {
        let fraction = trimmed.parse::<Decimal>().map_err(|_err| invalid())?;

        Ok(Percentage::from(fraction))
    }
}

/// Formats a percentage as points, e.g. `"15%"`.
pub fn format_percentage(percent: &Percentage) -> String {
    let points = ((*percent) * Decimal::ONE_HUNDRED).normalize();

    format!("{points}%")
}
