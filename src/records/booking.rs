//! Booking Records

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    booking::{Booking, BookingParts, Milestones, Package, SessionWindow},
    identity::{BookingCode, PublicSlug},
    pricing::{Discount, ManualDiscount},
    print::{PrintOrder, PrintOrderStatus},
    records::{
        RecordError,
        add_ons::AddOnRecord,
        format_percentage, format_price, parse_percentage, parse_price, parse_price_in,
        vouchers::{VoucherKindRecord, VoucherRecord},
    },
    roles::ActorRole,
    status::{BookingStatus, PaymentStatus},
};

/// A booking as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Booking code, e.g. `YJS-20260201-001`.
    pub code: String,

    /// Public status page slug.
    pub slug: String,

    /// Client name.
    pub client_name: String,

    /// Booking status name.
    pub status: String,

    /// Payment status name.
    pub payment_status: String,

    /// Amount received so far, e.g. `"250000 IDR"`. Missing means nothing received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<String>,

    /// Session slot.
    pub session: SessionRecord,

    /// Package snapshot.
    pub package: PackageRecord,

    /// Add-on lines.
    #[serde(default)]
    pub add_ons: Vec<AddOnRecord>,

    /// Applied discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountRecord>,

    /// Link to the delivered photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_link: Option<String>,

    /// Print order, if one was started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_order: Option<PrintOrderRecord>,

    /// Milestone timestamps.
    #[serde(flatten)]
    pub milestones: MilestonesRecord,
}

/// Session slot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session day.
    pub date: Date,

    /// Start time.
    pub start: Time,

    /// End time.
    pub end: Time,
}

/// Package snapshot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name.
    pub name: String,

    /// Package price, e.g. `"500000 IDR"`.
    pub price: String,
}

/// Discount record, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountRecord {
    /// A catalog voucher, carried with its terms so the amount can follow the subtotal.
    Voucher {
        /// Voucher code.
        code: String,

        /// Voucher discount type.
        #[serde(rename = "voucher_type")]
        kind: VoucherKindRecord,

        /// Price for `FIXED`, percentage for `PERCENTAGE`.
        value: String,

        /// Minimum subtotal for the voucher to apply.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_purchase: Option<String>,
    },

    /// A manual discount with exactly one of `percentage` or `fixed`.
    Manual {
        /// Percentage such as `"10%"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        percentage: Option<String>,

        /// Fixed amount such as `"100000 IDR"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fixed: Option<String>,

        /// Justification.
        #[serde(default)]
        reason: String,
    },
}

/// Print order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOrderRecord {
    /// Print status name.
    pub status: String,

    /// Selected photos descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_photos: Option<String>,

    /// Print vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Courier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<String>,

    /// Courier tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,

    /// When the prints shipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<Timestamp>,
}

/// Milestone timestamps record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonesRecord {
    /// Booking created.
    pub created_at: Timestamp,

    /// Payment confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,

    /// Photos delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<Timestamp>,

    /// Booking closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,

    /// Booking cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,
}

/// A status change request from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    /// Requested status name.
    pub status: String,

    /// Actor role name. Unknown roles get no permissions.
    pub role: String,

    /// When the change was requested.
    pub at: Timestamp,
}

/// A validated status change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Requested status.
    pub target: BookingStatus,

    /// Actor role.
    pub role: ActorRole,

    /// When the change was requested.
    pub at: Timestamp,
}

impl TryFrom<StatusChangeRecord> for StatusChange {
    type Error = RecordError;

    fn try_from(record: StatusChangeRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            target: record.status.parse()?,
            role: ActorRole::parse(&record.role),
            at: record.at,
        })
    }
}

impl BookingRecord {
    /// Parses a JSON snapshot into a booking.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] for malformed JSON or invalid field values.
    pub fn from_json(json: &str) -> Result<Booking<'static>, RecordError> {
        let record: BookingRecord = serde_json::from_str(json)?;

        record.try_into()
    }

    /// Serialises a booking as a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if serialisation fails.
    pub fn to_json(booking: &Booking<'_>) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(&BookingRecord::from(booking))?)
    }
}

impl TryFrom<DiscountRecord> for Discount<'static> {
    type Error = RecordError;

    fn try_from(record: DiscountRecord) -> Result<Self, Self::Error> {
        match record {
            DiscountRecord::Voucher {
                code,
                kind,
                value,
                min_purchase,
            } => {
                let voucher = VoucherRecord {
                    kind,
                    value,
                    min_purchase,
                    valid_from: None,
                    valid_until: None,
                }
                .into_voucher(&code)?;

                Ok(Discount::Voucher(voucher))
            }
            DiscountRecord::Manual {
                percentage,
                fixed,
                reason,
            } => {
                let value = match (percentage, fixed) {
                    (Some(percentage), None) => {
                        ManualDiscount::Percentage(parse_percentage(&percentage)?)
                    }
                    (None, Some(fixed)) => ManualDiscount::Fixed(parse_price(&fixed)?),
                    _ => return Err(RecordError::InvalidDiscount),
                };

                Ok(Discount::Manual { value, reason })
            }
        }
    }
}

impl From<&Discount<'_>> for DiscountRecord {
    fn from(discount: &Discount<'_>) -> Self {
        match discount {
            Discount::Voucher(voucher) => {
                let record = VoucherRecord::from(voucher);

                DiscountRecord::Voucher {
                    code: voucher.code.clone(),
                    kind: record.kind,
                    value: record.value,
                    min_purchase: record.min_purchase,
                }
            }
            Discount::Manual { value, reason } => {
                let (percentage, fixed) = match value {
                    ManualDiscount::Percentage(percent) => (Some(format_percentage(percent)), None),
                    ManualDiscount::Fixed(amount) => (None, Some(format_price(amount))),
                };

                DiscountRecord::Manual {
                    percentage,
                    fixed,
                    reason: reason.clone(),
                }
            }
        }
    }
}

impl TryFrom<PrintOrderRecord> for PrintOrder {
    type Error = RecordError;

    fn try_from(record: PrintOrderRecord) -> Result<Self, Self::Error> {
        let mut order = PrintOrder::new();

        order.set_status(record.status.parse::<PrintOrderStatus>()?);
        order.restore_details(record.selected_photos, record.vendor);
        order.restore_shipment(record.courier, record.tracking_number, record.shipped_at);

        Ok(order)
    }
}

impl From<&PrintOrder> for PrintOrderRecord {
    fn from(order: &PrintOrder) -> Self {
        Self {
            status: order.status().to_string(),
            selected_photos: order.selected_photos().map(str::to_string),
            vendor: order.vendor().map(str::to_string),
            courier: order.courier().map(str::to_string),
            tracking_number: order.tracking_number().map(str::to_string),
            shipped_at: order.shipped_at(),
        }
    }
}

impl TryFrom<BookingRecord> for Booking<'static> {
    type Error = RecordError;

    fn try_from(record: BookingRecord) -> Result<Self, Self::Error> {
        let price = parse_price(&record.package.price)?;
        let currency: &'static Currency = price.currency();

        let amount_paid = match &record.amount_paid {
            Some(amount) => parse_price_in(amount, currency)?,
            None => Money::from_minor(0, currency),
        };

        let add_ons = record
            .add_ons
            .into_iter()
            .map(|add_on| add_on.into_line_item(currency))
            .collect::<Result<Vec<_>, _>>()?;

        let discount = record.discount.map(Discount::try_from).transpose()?;
        let print_order = record.print_order.map(PrintOrder::try_from).transpose()?;

        let parts = BookingParts {
            code: record.code.parse::<BookingCode>()?,
            slug: PublicSlug::parse(&record.slug)?,
            client_name: record.client_name,
            status: record.status.parse::<BookingStatus>()?,
            payment_status: record.payment_status.parse::<PaymentStatus>()?,
            amount_paid,
            session: SessionWindow::new(
                record.session.date,
                record.session.start,
                record.session.end,
            )?,
            package: Package {
                name: record.package.name,
                price,
            },
            add_ons,
            discount,
            photo_link: record.photo_link.filter(|link| !link.trim().is_empty()),
            print_order,
            milestones: Milestones {
                created_at: record.milestones.created_at,
                paid_at: record.milestones.paid_at,
                delivered_at: record.milestones.delivered_at,
                closed_at: record.milestones.closed_at,
                cancelled_at: record.milestones.cancelled_at,
            },
        };

        Ok(Booking::restore(parts)?)
    }
}

impl From<&Booking<'_>> for BookingRecord {
    fn from(booking: &Booking<'_>) -> Self {
        let milestones = booking.milestones();
        let session = booking.session();
        let amount_paid = booking.amount_paid();

        Self {
            code: booking.code().to_string(),
            slug: booking.slug().to_string(),
            client_name: booking.client_name().to_string(),
            status: booking.status().to_string(),
            payment_status: booking.payment_status().to_string(),
            amount_paid: (amount_paid.to_minor_units() != 0).then(|| format_price(&amount_paid)),
            session: SessionRecord {
                date: session.date(),
                start: session.start(),
                end: session.end(),
            },
            package: PackageRecord {
                name: booking.package().name.clone(),
                price: format_price(&booking.package().price),
            },
            add_ons: booking.add_ons().iter().map(AddOnRecord::from).collect(),
            discount: booking.discount().map(DiscountRecord::from),
            photo_link: booking.photo_link().map(str::to_string),
            print_order: booking.print_order().map(PrintOrderRecord::from),
            milestones: MilestonesRecord {
                created_at: milestones.created_at,
                paid_at: milestones.paid_at,
                delivered_at: milestones.delivered_at,
                closed_at: milestones.closed_at,
                cancelled_at: milestones.cancelled_at,
            },
        }
    }
}
