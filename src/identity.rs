//! Booking identity
//!
//! Human-readable booking codes (`YJS-20260201-001`) and opaque public slugs for the customer
//! status page.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

/// Errors parsing or allocating booking identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The code is not `PREFIX-YYYYMMDD-NNN`.
    #[error("malformed booking code: {0:?}")]
    MalformedCode(String),

    /// Every sequence number for the day is taken.
    #[error("no booking sequence numbers left for {prefix} on {date}")]
    SequenceExhausted {
        /// Code prefix.
        prefix: String,

        /// Booking day.
        date: Date,
    },

    /// The slug is not a 32 character hex token.
    #[error("malformed public slug: {0:?}")]
    MalformedSlug(String),
}

/// A booking code such as `YJS-20260201-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookingCode {
    prefix: String,
    date: Date,
    sequence: u16,
}

impl BookingCode {
    /// Creates a code from its parts.
    pub fn new(prefix: impl Into<String>, date: Date, sequence: u16) -> Self {
        Self {
            prefix: prefix.into(),
            date,
            sequence,
        }
    }

    /// Allocates the next code for `prefix` on `date`, one past the highest sequence in `existing`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::SequenceExhausted`] if the day's sequence space is used up.
    pub fn next_for<'c>(
        prefix: &str,
        date: Date,
        existing: impl IntoIterator<Item = &'c BookingCode>,
    ) -> Result<Self, IdentityError> {
        let highest = existing
            .into_iter()
            .filter(|code| code.prefix == prefix && code.date == date)
            .map(|code| code.sequence)
            .max()
            .unwrap_or(0);

        let sequence = highest
            .checked_add(1)
            .ok_or_else(|| IdentityError::SequenceExhausted {
                prefix: prefix.to_string(),
                date,
            })?;

        Ok(Self::new(prefix, date, sequence))
    }

    /// Studio prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Day the booking was created.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Sequence number within the day.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:03}",
            self.prefix,
            self.date.strftime("%Y%m%d"),
            self.sequence
        )
    }
}

impl FromStr for BookingCode {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentityError::MalformedCode(s.to_string());

        let mut parts = s.rsplitn(3, '-');

        let (Some(sequence), Some(date), Some(prefix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        if prefix.is_empty()
            || date.len() != 8
            || sequence.len() < 3
            || !sequence.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let date = Date::strptime("%Y%m%d", date).map_err(|_err| malformed())?;
        let parsed = sequence.parse::<u16>().map_err(|_err| malformed())?;

        // Only the zero-padded form written by `Display` is accepted.
        if format!("{parsed:03}") != sequence {
            return Err(malformed());
        }

        Ok(Self::new(prefix, date, parsed))
    }
}

/// Opaque token identifying a booking on the public status page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicSlug(String);

impl PublicSlug {
    /// Generates a fresh random slug.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Validates an existing slug.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MalformedSlug`] unless `s` is 32 hex characters.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        if s.len() != 32 {
            return Err(IdentityError::MalformedSlug(s.to_string()));
        }

        let uuid =
            Uuid::try_parse(s).map_err(|_err| IdentityError::MalformedSlug(s.to_string()))?;

        Ok(Self(uuid.simple().to_string()))
    }

    /// The slug text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PublicSlug {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
