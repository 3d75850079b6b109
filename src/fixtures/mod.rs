//! Fixtures
//!
//! YAML fixture sets for tests and demos, laid out as `<base>/<category>/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    add_ons::AddOnTemplate,
    booking::Booking,
    records::{
        RecordError, add_ons::AddOnTemplatesRecord, booking::BookingRecord,
        vouchers::VouchersRecord,
    },
    vouchers::{VoucherCatalog, VoucherKind},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A record could not be converted
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Currency mismatch between fixture files
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Add-on template not found
    #[error("Add-on template not found: {0}")]
    AddOnNotFound(String),

    /// Booking not found
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// Nothing priced has been loaded yet
    #[error("No priced fixtures loaded yet; currency unknown")]
    NoCurrency,
}

/// Wrapper for bookings in YAML
#[derive(Debug, Deserialize)]
struct BookingsFixture {
    bookings: Vec<BookingRecord>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    vouchers: VoucherCatalog<'static>,
    add_ons: FxHashMap<String, AddOnTemplate<'static>>,
    bookings: Vec<Booking<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            vouchers: VoucherCatalog::new(),
            add_ons: FxHashMap::default(),
            bookings: Vec::new(),
            currency: None,
        }
    }

    /// Load vouchers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a voucher is invalid.
    pub fn load_vouchers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("vouchers", name)?;
        let fixture: VouchersRecord = serde_norway::from_str(&contents)?;

        for (code, record) in fixture.vouchers {
            let voucher = record.into_voucher(&code)?;

            if let VoucherKind::Fixed(amount) = &voucher.kind {
                self.check_currency(amount.currency())?;
            }

            if let Some(min_purchase) = &voucher.min_purchase {
                self.check_currency(min_purchase.currency())?;
            }

            self.vouchers.insert(voucher);
        }

        Ok(self)
    }

    /// Load add-on templates from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the currencies disagree.
    pub fn load_add_ons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("add_ons", name)?;
        let fixture: AddOnTemplatesRecord = serde_norway::from_str(&contents)?;

        for (key, record) in fixture.add_ons {
            let template = record.into_template(key.clone())?;

            self.check_currency(template.unit_price.currency())?;
            self.add_ons.insert(key, template);
        }

        Ok(self)
    }

    /// Load bookings from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a booking is invalid.
    pub fn load_bookings(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("bookings", name)?;
        let fixture: BookingsFixture = serde_norway::from_str(&contents)?;

        for record in fixture.bookings {
            let booking = Booking::try_from(record)?;

            self.check_currency(booking.currency())?;
            self.bookings.push(booking);
        }

        Ok(self)
    }

    /// Load a complete fixture set (vouchers, add-ons and bookings with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_vouchers(name)?
            .load_add_ons(name)?
            .load_bookings(name)?;

        Ok(fixture)
    }

    /// Get the voucher catalog
    pub fn vouchers(&self) -> &VoucherCatalog<'static> {
        &self.vouchers
    }

    /// Get an add-on template by key
    ///
    /// # Errors
    ///
    /// Returns an error if the template is not found.
    pub fn add_on(&self, key: &str) -> Result<&AddOnTemplate<'static>, FixtureError> {
        self.add_ons
            .get(key)
            .ok_or_else(|| FixtureError::AddOnNotFound(key.to_string()))
    }

    /// Get all bookings, in file order
    pub fn bookings(&self) -> &[Booking<'static>] {
        &self.bookings
    }

    /// Get a booking by its code
    ///
    /// # Errors
    ///
    /// Returns an error if no loaded booking has this code.
    pub fn booking(&self, code: &str) -> Result<&Booking<'static>, FixtureError> {
        self.bookings
            .iter()
            .find(|booking| booking.code().to_string() == code)
            .ok_or_else(|| FixtureError::BookingNotFound(code.to_string()))
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if nothing priced has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn read(&self, category: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        Ok(fs::read_to_string(&file_path)?)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
