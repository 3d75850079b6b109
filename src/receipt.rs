//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    booking::Booking,
    pricing::{Discount, PricingError},
    status::PaymentStatus,
};

/// Errors that can occur when building or rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// A single priced line on the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// What was bought.
    pub description: String,

    /// Number of units.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money<'a, Currency>,

    /// `quantity × unit_price`.
    pub amount: Money<'a, Currency>,
}

/// Price breakdown for a booking, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    code: String,
    client_name: String,
    lines: Vec<ReceiptLine<'a>>,
    subtotal: Money<'a, Currency>,
    discount_label: Option<String>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    amount_paid: Money<'a, Currency>,
    payment_status: PaymentStatus,
}

impl<'a> Receipt<'a> {
    /// Builds a receipt from the booking's current quote.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an add-on line cannot be priced.
    pub fn from_booking(booking: &Booking<'a>) -> Result<Self, ReceiptError> {
        let package = booking.package();

        let mut lines = Vec::with_capacity(booking.add_ons().len() + 1);

        lines.push(ReceiptLine {
            description: package.name.clone(),
            quantity: 1,
            unit_price: package.price,
            amount: package.price,
        });

        for add_on in booking.add_ons() {
            lines.push(ReceiptLine {
                description: add_on.name().to_string(),
                quantity: add_on.quantity(),
                unit_price: *add_on.unit_price(),
                amount: add_on.subtotal()?,
            });
        }

        let quote = booking.quote();

        Ok(Self {
            code: booking.code().to_string(),
            client_name: booking.client_name().to_string(),
            lines,
            subtotal: quote.subtotal(),
            discount_label: booking.discount().map(Discount::describe),
            discount: quote.discount(),
            total: quote.total(),
            amount_paid: booking.amount_paid(),
            payment_status: booking.payment_status(),
        })
    }

    /// Package and add-on lines.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Package price plus add-ons.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount amount.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Amount still owed. Never negative.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the amounts are in different currencies.
    pub fn balance_due(&self) -> Result<Money<'a, Currency>, MoneyError> {
        let balance = self.total.sub(self.amount_paid)?;

        if balance.to_minor_units() < 0 {
            Ok(Money::from_minor(0, self.total.currency()))
        } else {
            Ok(balance)
        }
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be calculated or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "{} · {}", self.code, self.client_name).map_err(|_err| ReceiptError::IO)?;

        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Amount"]);

        for line in &self.lines {
            builder.push_record([
                line.description.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.amount.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        let discount_label = match &self.discount_label {
            Some(label) => format!("{label}:"),
            None => "Discount:".to_string(),
        };

        let summary = [
            ("Subtotal:".to_string(), self.subtotal.to_string()),
            (discount_label, format!("-{}", self.discount)),
            ("Total:".to_string(), self.total.to_string()),
            ("Paid:".to_string(), self.amount_paid.to_string()),
            ("Balance due:".to_string(), self.balance_due()?.to_string()),
            ("Payment:".to_string(), self.payment_status.to_string()),
        ];

        let label_width = summary
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();

        let value_width = summary
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in &summary {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        Ok(())
    }
}
