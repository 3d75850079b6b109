//! Studio configuration

use std::{fs, path::Path};

use jiff::civil::Date;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    identity::{BookingCode, IdentityError},
    records::{RecordError, currency_for},
};

/// Errors loading studio configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The configured currency is not supported.
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    /// Booking codes need a prefix.
    #[error("booking code prefix must not be empty")]
    EmptyPrefix,
}

/// Studio-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Prefix for booking codes, e.g. `YJS`.
    pub code_prefix: String,

    /// ISO code of the studio's trading currency.
    pub currency: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            code_prefix: "YJS".to_string(),
            currency: "IDR".to_string(),
        }
    }
}

impl StudioConfig {
    /// Parses configuration from YAML. Missing keys fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the prefix is blank.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: StudioConfig = serde_norway::from_str(yaml)?;

        if config.code_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// The studio's currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_for(&self.currency).map_err(|err| match err {
            RecordError::UnknownCurrency(code) => ConfigError::UnknownCurrency(code),
            other => ConfigError::UnknownCurrency(other.to_string()),
        })
    }

    /// Allocates the next booking code for `date` using the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the day's sequence numbers are used up.
    pub fn next_booking_code<'c>(
        &self,
        date: Date,
        existing: impl IntoIterator<Item = &'c BookingCode>,
    ) -> Result<BookingCode, IdentityError> {
        BookingCode::next_for(&self.code_prefix, date, existing)
    }
}
