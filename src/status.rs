//! Booking and payment statuses

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status string that does not name any known status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} status: {value:?}")]
pub struct UnknownStatusError {
    /// Which status family was being parsed (booking, payment, print order).
    pub kind: &'static str,

    /// The rejected input.
    pub value: String,
}

impl UnknownStatusError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lifecycle status of a booking.
///
/// The first five variants form a strictly ordered progression. `Cancelled` sits outside that
/// order and is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Session booked, nothing paid yet.
    Booked,

    /// Payment confirmed.
    Paid,

    /// Photo session has taken place.
    ShootDone,

    /// Edited photos handed over to the client.
    PhotosDelivered,

    /// Engagement finished.
    Closed,

    /// Engagement cancelled.
    Cancelled,
}

impl BookingStatus {
    /// The canonical progression, in order.
    pub const PROGRESSION: [BookingStatus; 5] = [
        BookingStatus::Booked,
        BookingStatus::Paid,
        BookingStatus::ShootDone,
        BookingStatus::PhotosDelivered,
        BookingStatus::Closed,
    ];

    /// Every status, progression first and `Cancelled` last.
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Booked,
        BookingStatus::Paid,
        BookingStatus::ShootDone,
        BookingStatus::PhotosDelivered,
        BookingStatus::Closed,
        BookingStatus::Cancelled,
    ];

    /// Position in the canonical progression, or `None` for `Cancelled`.
    pub const fn index(self) -> Option<usize> {
        match self {
            BookingStatus::Booked => Some(0),
            BookingStatus::Paid => Some(1),
            BookingStatus::ShootDone => Some(2),
            BookingStatus::PhotosDelivered => Some(3),
            BookingStatus::Closed => Some(4),
            BookingStatus::Cancelled => None,
        }
    }

    /// The following step in the progression, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            BookingStatus::Booked => Some(BookingStatus::Paid),
            BookingStatus::Paid => Some(BookingStatus::ShootDone),
            BookingStatus::ShootDone => Some(BookingStatus::PhotosDelivered),
            BookingStatus::PhotosDelivered => Some(BookingStatus::Closed),
            BookingStatus::Closed | BookingStatus::Cancelled => None,
        }
    }

    /// Whether the status ends the lifecycle.
    pub const fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Closed | BookingStatus::Cancelled)
    }

    /// Whether the booking has been cancelled.
    pub const fn is_cancelled(self) -> bool {
        matches!(self, BookingStatus::Cancelled)
    }

    /// Whether photos have been handed over (`PhotosDelivered` or `Closed`).
    pub const fn has_delivered_photos(self) -> bool {
        matches!(self, BookingStatus::PhotosDelivered | BookingStatus::Closed)
    }

    /// Wire name, e.g. `SHOOT_DONE`.
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Paid => "PAID",
            BookingStatus::ShootDone => "SHOOT_DONE",
            BookingStatus::PhotosDelivered => "PHOTOS_DELIVERED",
            BookingStatus::Closed => "CLOSED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable milestone label.
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::Paid => "Payment Confirmed",
            BookingStatus::ShootDone => "Shoot Done",
            BookingStatus::PhotosDelivered => "Photos Delivered",
            BookingStatus::Closed => "Closed",
            BookingStatus::Cancelled => "Order Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError::new("booking", s))
    }
}

/// Payment status, tracked independently of [`BookingStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing received.
    Unpaid,

    /// Some, but not all, of the total received.
    PartiallyPaid,

    /// The full total received.
    Paid,
}

impl PaymentStatus {
    /// Every payment status.
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Unpaid,
        PaymentStatus::PartiallyPaid,
        PaymentStatus::Paid,
    ];

    /// Wire name, e.g. `PARTIALLY_PAID`.
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::PartiallyPaid => "PARTIALLY_PAID",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError::new("payment", s))
    }
}
