//! Add-on Records

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    add_ons::{AddOnLineItem, AddOnTemplate},
    records::{RecordError, format_price, parse_price, parse_price_in},
};

/// Wrapper for add-on templates in YAML
#[derive(Debug, Deserialize)]
pub struct AddOnTemplatesRecord {
    /// Map of template key -> template record
    pub add_ons: FxHashMap<String, AddOnTemplateRecord>,
}

/// Add-on template record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddOnTemplateRecord {
    /// Display name
    pub name: String,

    /// Unit price (e.g., "50000 IDR")
    pub price: String,
}

impl AddOnTemplateRecord {
    /// Converts the record into a template under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn into_template(self, key: String) -> Result<AddOnTemplate<'static>, RecordError> {
        Ok(AddOnTemplate {
            key,
            name: self.name,
            unit_price: parse_price(&self.price)?,
        })
    }
}

/// An add-on line as stored on a booking.
///
/// Missing quantities and prices default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnRecord {
    /// Display name.
    pub name: String,

    /// Number of units.
    #[serde(default)]
    pub quantity: u32,

    /// Price per unit, e.g. `"50000 IDR"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,

    /// Template key, for lines drawn from the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl AddOnRecord {
    /// Converts the record into a line item priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is malformed, negative, or in another currency.
    pub fn into_line_item(
        self,
        currency: &'static Currency,
    ) -> Result<AddOnLineItem<'static>, RecordError> {
        let unit_price = match &self.unit_price {
            Some(price) => parse_price_in(price, currency)?,
            None => Money::from_minor(0, currency),
        };

        let item = match self.template {
            Some(key) => AddOnLineItem::from_template(
                &AddOnTemplate {
                    key,
                    name: self.name,
                    unit_price,
                },
                self.quantity,
            )?,
            None => AddOnLineItem::custom(self.name, self.quantity, unit_price)?,
        };

        Ok(item)
    }
}

impl From<&AddOnLineItem<'_>> for AddOnRecord {
    fn from(item: &AddOnLineItem<'_>) -> Self {
        Self {
            name: item.name().to_string(),
            quantity: item.quantity(),
            unit_price: Some(format_price(item.unit_price())),
            template: item.template().map(str::to_string),
        }
    }
}
