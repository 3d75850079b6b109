//! Add-ons
//!
//! Extra purchasable items attached to a booking, either drawn from a named template or entered
//! as a custom line.

use rusty_money::{Money, iso::Currency};

use crate::pricing::{PricingError, ensure_non_negative};

/// A catalog entry staff can pick from when adding extras to a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnTemplate<'a> {
    /// Catalog key, e.g. `extra-print`.
    pub key: String,

    /// Display name.
    pub name: String,

    /// Default unit price.
    pub unit_price: Money<'a, Currency>,
}

/// A single add-on line on a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnLineItem<'a> {
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    template: Option<String>,
}

impl<'a> AddOnLineItem<'a> {
    /// Creates a free-text add-on with an arbitrary price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeAmount`] if the unit price is negative.
    pub fn custom(
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money<'a, Currency>,
    ) -> Result<Self, PricingError> {
        ensure_non_negative(&unit_price)?;

        Ok(Self {
            name: name.into(),
            quantity,
            unit_price,
            template: None,
        })
    }

    /// Creates an add-on from a catalog template.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeAmount`] if the template price is negative.
    pub fn from_template(
        template: &AddOnTemplate<'a>,
        quantity: u32,
    ) -> Result<Self, PricingError> {
        ensure_non_negative(&template.unit_price)?;

        Ok(Self {
            name: template.name.clone(),
            quantity,
            unit_price: template.unit_price,
            template: Some(template.key.clone()),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price per unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Key of the template this line was drawn from, if any.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Whether this line was entered by hand rather than drawn from a template.
    pub fn is_custom(&self) -> bool {
        self.template.is_none()
    }

    /// `quantity × unit_price`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}
