//! Booking
//!
//! The booking aggregate ties together status transitions, pricing, payment status and the
//! optional print order. Every mutation goes through a method here so the derived values (quote,
//! payment status, milestones) never drift from their inputs.

use jiff::{
    SignedDuration, Timestamp,
    civil::{Date, Time},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    add_ons::AddOnLineItem,
    identity::{BookingCode, PublicSlug},
    payment::{PaymentUpdate, payment_status_for, recompute_payment_status},
    pricing::{Discount, ManualDiscount, PricingError, Quote, compute_total},
    print::{Confirmation, PrintOrder, PrintOrderError},
    roles::ActorRole,
    status::{BookingStatus, PaymentStatus},
    timeline::{Timeline, project_timeline},
    transitions::{self, StatusOptions, TransitionError},
    vouchers::{VoucherCatalog, VoucherError},
};

/// Errors raised by booking mutations.
#[derive(Debug, Error, PartialEq)]
pub enum BookingError {
    /// The actor may not make this status change.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Photos cannot be marked delivered without a link to them.
    #[error("a photo link is required before photos can be marked delivered")]
    MissingPhotoLink,

    /// The session ends at or before its start.
    #[error("session must end after it starts (start {start}, end {end})")]
    InvalidSessionWindow {
        /// Session start.
        start: Time,

        /// Session end.
        end: Time,
    },

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The voucher could not be applied.
    #[error(transparent)]
    Voucher(#[from] VoucherError),

    /// Print order action failed.
    #[error(transparent)]
    PrintOrder(#[from] PrintOrderError),
}

/// Outcome of repricing a booking.
#[derive(Debug, PartialEq)]
pub struct RepriceOutcome<'a> {
    /// Recomputed payment status, with a warning if a settled total moved.
    pub payment: PaymentUpdate<'a>,

    /// Set when the booking's voucher no longer qualifies and was removed.
    pub dropped_voucher: Option<VoucherError>,
}

/// A photo package snapshot: name and price at the time of booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Package<'a> {
    /// Package name.
    pub name: String,

    /// Package price.
    pub price: Money<'a, Currency>,
}

/// The booked session slot. The duration is derived from the start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    date: Date,
    start: Time,
    end: Time,
}

impl SessionWindow {
    /// Creates a session window.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidSessionWindow`] unless `end` is after `start`.
    pub fn new(date: Date, start: Time, end: Time) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidSessionWindow { start, end });
        }

        Ok(Self { date, start, end })
    }

    /// Session day.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Start time.
    pub fn start(&self) -> Time {
        self.start
    }

    /// End time.
    pub fn end(&self) -> Time {
        self.end
    }

    /// Session length.
    pub fn duration(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }
}

/// When each milestone was reached. Re-entering a status overwrites its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestones {
    /// Booking created.
    pub created_at: Timestamp,

    /// Payment confirmed.
    pub paid_at: Option<Timestamp>,

    /// Photos delivered.
    pub delivered_at: Option<Timestamp>,

    /// Booking closed.
    pub closed_at: Option<Timestamp>,

    /// Booking cancelled.
    pub cancelled_at: Option<Timestamp>,
}

impl Milestones {
    /// Milestones for a booking created at `created_at`.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            created_at,
            paid_at: None,
            delivered_at: None,
            closed_at: None,
            cancelled_at: None,
        }
    }

    fn stamp(&mut self, status: BookingStatus, at: Timestamp) {
        let slot = match status {
            BookingStatus::Booked | BookingStatus::ShootDone => return,
            BookingStatus::Paid => &mut self.paid_at,
            BookingStatus::PhotosDelivered => &mut self.delivered_at,
            BookingStatus::Closed => &mut self.closed_at,
            BookingStatus::Cancelled => &mut self.cancelled_at,
        };

        *slot = Some(at);
    }
}

/// Stored booking state, used to rebuild a [`Booking`] from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingParts<'a> {
    /// Booking code.
    pub code: BookingCode,

    /// Public status page slug.
    pub slug: PublicSlug,

    /// Client name.
    pub client_name: String,

    /// Current status.
    pub status: BookingStatus,

    /// Stored payment status.
    pub payment_status: PaymentStatus,

    /// Amount received so far.
    pub amount_paid: Money<'a, Currency>,

    /// Session slot.
    pub session: SessionWindow,

    /// Package snapshot.
    pub package: Package<'a>,

    /// Add-on lines.
    pub add_ons: Vec<AddOnLineItem<'a>>,

    /// Applied discount.
    pub discount: Option<Discount<'a>>,

    /// Link to the delivered photos.
    pub photo_link: Option<String>,

    /// Print order, if one was started.
    pub print_order: Option<PrintOrder>,

    /// Milestone timestamps.
    pub milestones: Milestones,
}

/// A photo session booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking<'a> {
    code: BookingCode,
    slug: PublicSlug,
    client_name: String,
    status: BookingStatus,
    payment_status: PaymentStatus,
    amount_paid: Money<'a, Currency>,
    session: SessionWindow,
    package: Package<'a>,
    add_ons: Vec<AddOnLineItem<'a>>,
    discount: Option<Discount<'a>>,
    quote: Quote<'a>,
    photo_link: Option<String>,
    print_order: Option<PrintOrder>,
    milestones: Milestones,
}

impl<'a> Booking<'a> {
    /// Creates a booking in `BOOKED`, `UNPAID`, priced at the package price.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the package price is negative.
    pub fn new(
        code: BookingCode,
        slug: PublicSlug,
        client_name: String,
        session: SessionWindow,
        package: Package<'a>,
        created_at: Timestamp,
    ) -> Result<Self, BookingError> {
        let quote = compute_total(package.price, &[], None)?;

        debug!(%code, total = %quote.total(), "booking created");

        Ok(Self {
            code,
            slug,
            client_name,
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            amount_paid: Money::from_minor(0, package.price.currency()),
            session,
            package,
            add_ons: Vec::new(),
            discount: None,
            quote,
            photo_link: None,
            print_order: None,
            milestones: Milestones::new(created_at),
        })
    }

    /// Rebuilds a booking from stored parts, recomputing the quote.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the stored amounts cannot be priced, or
    /// [`PrintOrderError::BookingNotDelivered`] for a print order on a booking whose photos
    /// were never delivered.
    pub fn restore(parts: BookingParts<'a>) -> Result<Self, BookingError> {
        if parts.print_order.is_some() && !parts.status.has_delivered_photos() {
            return Err(PrintOrderError::BookingNotDelivered(parts.status).into());
        }

        let quote = compute_total(parts.package.price, &parts.add_ons, parts.discount.as_ref())?;

        Ok(Self {
            code: parts.code,
            slug: parts.slug,
            client_name: parts.client_name,
            status: parts.status,
            payment_status: parts.payment_status,
            amount_paid: parts.amount_paid,
            session: parts.session,
            package: parts.package,
            add_ons: parts.add_ons,
            discount: parts.discount,
            quote,
            photo_link: parts.photo_link,
            print_order: parts.print_order,
            milestones: parts.milestones,
        })
    }

    /// Booking code.
    pub fn code(&self) -> &BookingCode {
        &self.code
    }

    /// Public status page slug.
    pub fn slug(&self) -> &PublicSlug {
        &self.slug
    }

    /// Client name.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Current status.
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Current payment status.
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Amount received so far.
    pub fn amount_paid(&self) -> Money<'a, Currency> {
        self.amount_paid
    }

    /// Session slot.
    pub fn session(&self) -> &SessionWindow {
        &self.session
    }

    /// Package snapshot.
    pub fn package(&self) -> &Package<'a> {
        &self.package
    }

    /// Add-on lines.
    pub fn add_ons(&self) -> &[AddOnLineItem<'a>] {
        &self.add_ons
    }

    /// Applied discount.
    pub fn discount(&self) -> Option<&Discount<'a>> {
        self.discount.as_ref()
    }

    /// Current price breakdown.
    pub fn quote(&self) -> &Quote<'a> {
        &self.quote
    }

    /// Currency of every amount on this booking.
    pub fn currency(&self) -> &'a Currency {
        self.package.price.currency()
    }

    /// Link to the delivered photos.
    pub fn photo_link(&self) -> Option<&str> {
        self.photo_link.as_deref()
    }

    /// Milestone timestamps.
    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    /// Sets the photo link. A blank link counts as missing.
    pub fn set_photo_link(&mut self, link: impl Into<String>) {
        let link = link.into();

        self.photo_link = if link.trim().is_empty() {
            None
        } else {
            Some(link)
        };
    }

    /// Statuses `role` may pick from for this booking.
    pub fn available_options(&self, role: ActorRole) -> StatusOptions {
        transitions::available_options(self.status, role)
    }

    /// Moves the booking to `target` on behalf of `role`, returning the previous status.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Transition`] if the role may not make the change,
    /// [`BookingError::MissingPhotoLink`] when delivering photos without a link, or
    /// [`PrintOrderError::Attached`] when leaving the delivered states while a print order
    /// exists.
    pub fn change_status(
        &mut self,
        target: BookingStatus,
        role: ActorRole,
        at: Timestamp,
    ) -> Result<BookingStatus, BookingError> {
        let previous = self.status;

        if let Err(err) = transitions::validate_transition(previous, target, role) {
            warn!(code = %self.code, %previous, %target, %role, "status change rejected");

            return Err(err.into());
        }

        if previous == target {
            return Ok(previous);
        }

        if target == BookingStatus::PhotosDelivered && self.photo_link.is_none() {
            warn!(code = %self.code, "photos delivered without a photo link");

            return Err(BookingError::MissingPhotoLink);
        }

        // A print order only exists once photos are delivered.
        if self.print_order.is_some() && !target.has_delivered_photos() {
            warn!(code = %self.code, %previous, %target, "status change blocked by print order");

            return Err(PrintOrderError::Attached(target).into());
        }

        self.status = target;
        self.milestones.stamp(target, at);

        debug!(code = %self.code, %previous, %target, %role, "status changed");

        Ok(previous)
    }

    /// Replaces add-ons and discount, then recomputes the quote and payment status.
    ///
    /// A voucher discount is re-resolved against the new subtotal. If the subtotal has dropped
    /// below the voucher's minimum purchase, the voucher is removed and the reason is returned
    /// in [`RepriceOutcome::dropped_voucher`]. The booking is left untouched if pricing fails.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the new inputs cannot be priced.
    pub fn reprice(
        &mut self,
        add_ons: Vec<AddOnLineItem<'a>>,
        discount: Option<Discount<'a>>,
    ) -> Result<RepriceOutcome<'a>, BookingError> {
        let quote = compute_total(self.package.price, &add_ons, discount.as_ref())?;

        let mut discount = discount;
        let mut dropped_voucher = None;

        // Below the minimum the voucher already priced at zero, so the quote stands.
        if let Some(Discount::Voucher(voucher)) = &discount
            && !voucher.meets_min_purchase(&quote.subtotal())?
        {
            let reason = voucher.below_minimum(&quote.subtotal());

            warn!(code = %self.code, %reason, "voucher removed on reprice");

            dropped_voucher = Some(reason);
            discount = None;
        }

        let update =
            recompute_payment_status(self.payment_status, &self.quote.total(), &quote.total());

        if let Some(warning) = &update.warning {
            warn!(code = %self.code, %warning, "settled booking repriced");
        }

        debug!(
            code = %self.code,
            subtotal = %quote.subtotal(),
            discount = %quote.discount(),
            total = %quote.total(),
            "booking repriced"
        );

        self.add_ons = add_ons;
        self.discount = discount;
        self.quote = quote;
        self.payment_status = update.status;

        Ok(RepriceOutcome {
            payment: update,
            dropped_voucher,
        })
    }

    /// Adds an add-on line and reprices.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the booking cannot be priced with the new line.
    pub fn add_add_on(
        &mut self,
        item: AddOnLineItem<'a>,
    ) -> Result<RepriceOutcome<'a>, BookingError> {
        let mut add_ons = self.add_ons.clone();
        add_ons.push(item);

        self.reprice(add_ons, self.discount.clone())
    }

    /// Removes the add-on line at `index` and reprices. Out-of-range indexes change nothing.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the booking cannot be priced without the line.
    pub fn remove_add_on(&mut self, index: usize) -> Result<RepriceOutcome<'a>, BookingError> {
        if index >= self.add_ons.len() {
            return Ok(RepriceOutcome {
                payment: PaymentUpdate {
                    status: self.payment_status,
                    warning: None,
                },
                dropped_voucher: None,
            });
        }

        let mut add_ons = self.add_ons.clone();
        add_ons.remove(index);

        self.reprice(add_ons, self.discount.clone())
    }

    /// Resolves `code` against the current subtotal and applies it, replacing any discount.
    ///
    /// A rejected voucher leaves the booking unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Voucher`] if the voucher is invalid.
    pub fn apply_voucher(
        &mut self,
        catalog: &VoucherCatalog<'a>,
        code: &str,
        on: Date,
    ) -> Result<RepriceOutcome<'a>, BookingError> {
        let resolved = catalog.resolve(code, &self.quote.subtotal(), on)?;

        self.reprice(self.add_ons.clone(), Some(resolved.into_discount()))
    }

    /// Applies a manual discount, replacing any discount.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the discount is negative or in another currency.
    pub fn apply_manual_discount(
        &mut self,
        value: ManualDiscount<'a>,
        reason: impl Into<String>,
    ) -> Result<RepriceOutcome<'a>, BookingError> {
        let discount = Discount::Manual {
            value,
            reason: reason.into(),
        };

        self.reprice(self.add_ons.clone(), Some(discount))
    }

    /// Removes the discount and reprices.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the booking cannot be priced.
    pub fn clear_discount(&mut self) -> Result<RepriceOutcome<'a>, BookingError> {
        self.reprice(self.add_ons.clone(), None)
    }

    /// Records the total amount received so far and derives the payment status from it.
    ///
    /// # Errors
    ///
    /// Returns a pricing error if the amount is negative or in another currency.
    pub fn record_payment(
        &mut self,
        amount_paid: Money<'a, Currency>,
    ) -> Result<PaymentStatus, BookingError> {
        let status = payment_status_for(&amount_paid, &self.quote.total())?;

        debug!(code = %self.code, %amount_paid, %status, "payment recorded");

        self.amount_paid = amount_paid;
        self.payment_status = status;

        Ok(status)
    }

    /// The print order, if any.
    pub fn print_order(&self) -> Option<&PrintOrder> {
        self.print_order.as_ref()
    }

    /// Starts a print order. Only possible once photos are delivered.
    ///
    /// # Errors
    ///
    /// Returns [`PrintOrderError::BookingNotDelivered`] before delivery, or
    /// [`PrintOrderError::AlreadyExists`] if one was already started.
    pub fn start_print_order(&mut self) -> Result<&mut PrintOrder, BookingError> {
        if !self.status.has_delivered_photos() {
            return Err(PrintOrderError::BookingNotDelivered(self.status).into());
        }

        if self.print_order.is_some() {
            return Err(PrintOrderError::AlreadyExists.into());
        }

        debug!(code = %self.code, "print order started");

        Ok(self.print_order.insert(PrintOrder::new()))
    }

    /// Mutable access to the print order.
    ///
    /// # Errors
    ///
    /// Returns [`PrintOrderError::NotFound`] if no print order exists.
    pub fn print_order_mut(&mut self) -> Result<&mut PrintOrder, BookingError> {
        self.print_order
            .as_mut()
            .ok_or_else(|| PrintOrderError::NotFound.into())
    }

    /// Deletes the print order. Irreversible, so it must be confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`PrintOrderError::ConfirmationRequired`] without confirmation, or
    /// [`PrintOrderError::NotFound`] if there is nothing to cancel.
    pub fn cancel_print_order(
        &mut self,
        confirmation: Confirmation,
    ) -> Result<PrintOrder, BookingError> {
        if confirmation != Confirmation::Confirmed {
            return Err(PrintOrderError::ConfirmationRequired.into());
        }

        let order = self.print_order.take().ok_or(PrintOrderError::NotFound)?;

        warn!(code = %self.code, status = %order.status(), "print order cancelled");

        Ok(order)
    }

    /// Progress timeline for this booking.
    pub fn timeline(&self) -> Timeline {
        project_timeline(self, self.print_order.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use jiff::civil::{date, time};
    use rust_decimal::Decimal;
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use super::*;
    use crate::{
        print::PrintOrderStatus,
        vouchers::{Voucher, VoucherKind},
    };

    fn idr(major: i64) -> Money<'static, Currency> {
        Money::from_minor(major * 10_i64.pow(IDR.exponent), IDR)
    }

    fn at(s: &str) -> TestResult<Timestamp> {
        Ok(s.parse()?)
    }

    fn booking() -> TestResult<Booking<'static>> {
        let session = SessionWindow::new(date(2026, 2, 14), time(9, 0, 0, 0), time(11, 30, 0, 0))?;

        Ok(Booking::new(
            BookingCode::new("YJS", date(2026, 2, 1), 1),
            PublicSlug::generate(),
            "Dewi".to_string(),
            session,
            Package {
                name: "Family Portrait".to_string(),
                price: idr(500_000),
            },
            at("2026-02-01T03:00:00Z")?,
        )?)
    }

    fn delivered_booking() -> TestResult<Booking<'static>> {
        let mut booking = booking()?;

        booking.set_photo_link("https://photos.example/dewi");
        booking.change_status(
            BookingStatus::PhotosDelivered,
            ActorRole::Owner,
            at("2026-02-20T10:00:00Z")?,
        )?;

        Ok(booking)
    }

    #[test]
    fn new_booking_is_booked_and_unpaid() -> TestResult {
        let booking = booking()?;

        assert_eq!(booking.status(), BookingStatus::Booked);
        assert_eq!(booking.payment_status(), PaymentStatus::Unpaid);
        assert_eq!(booking.quote().total(), idr(500_000));
        assert_eq!(booking.code().to_string(), "YJS-20260201-001");

        Ok(())
    }

    #[test]
    fn session_window_must_end_after_start() {
        let result = SessionWindow::new(date(2026, 2, 14), time(11, 0, 0, 0), time(11, 0, 0, 0));

        assert!(matches!(
            result,
            Err(BookingError::InvalidSessionWindow { .. })
        ));
    }

    #[test]
    fn session_duration_is_derived() -> TestResult {
        let booking = booking()?;

        assert_eq!(
            booking.session().duration(),
            SignedDuration::from_mins(150)
        );

        Ok(())
    }

    #[test]
    fn change_status_stamps_milestones() -> TestResult {
        let mut booking = booking()?;
        let paid_at = at("2026-02-02T09:00:00Z")?;

        let previous = booking.change_status(BookingStatus::Paid, ActorRole::Admin, paid_at)?;

        assert_eq!(previous, BookingStatus::Booked);
        assert_eq!(booking.status(), BookingStatus::Paid);
        assert_eq!(booking.milestones().paid_at, Some(paid_at));

        Ok(())
    }

    #[test]
    fn rejected_transition_leaves_booking_unchanged() -> TestResult {
        let mut booking = booking()?;
        booking.change_status(
            BookingStatus::Paid,
            ActorRole::Admin,
            at("2026-02-02T09:00:00Z")?,
        )?;

        let result = booking.change_status(
            BookingStatus::ShootDone,
            ActorRole::Photographer,
            at("2026-02-14T12:00:00Z")?,
        );

        assert_eq!(
            result,
            Err(BookingError::Transition(
                TransitionError::InvalidTransition {
                    from: BookingStatus::Paid,
                    to: BookingStatus::ShootDone,
                    role: ActorRole::Photographer,
                }
            ))
        );
        assert_eq!(booking.status(), BookingStatus::Paid);

        Ok(())
    }

    #[test]
    fn photos_delivered_requires_photo_link() -> TestResult {
        let mut booking = booking()?;
        booking.set_photo_link("   ");

        let result = booking.change_status(
            BookingStatus::PhotosDelivered,
            ActorRole::PackagingStaff,
            at("2026-02-20T10:00:00Z")?,
        );

        assert_eq!(result, Err(BookingError::MissingPhotoLink));
        assert_eq!(booking.status(), BookingStatus::Booked);

        Ok(())
    }

    #[test]
    fn voucher_reprices_the_booking() -> TestResult {
        let mut booking = booking()?;
        let catalog: VoucherCatalog<'_> = [Voucher::new(
            "WELCOME10",
            VoucherKind::Percentage(Percentage::from(Decimal::new(10, 2))),
        )]
        .into_iter()
        .collect();

        booking.add_add_on(AddOnLineItem::custom("Extra print", 2, idr(50_000))?)?;
        booking.apply_voucher(&catalog, "welcome10", date(2026, 2, 1))?;

        assert_eq!(booking.quote().subtotal(), idr(600_000));
        assert_eq!(booking.quote().discount(), idr(60_000));
        assert_eq!(booking.quote().total(), idr(540_000));
        assert_eq!(
            booking.discount().map(Discount::describe),
            Some("Voucher WELCOME10".to_string())
        );

        Ok(())
    }

    #[test]
    fn invalid_voucher_keeps_existing_discount() -> TestResult {
        let mut booking = booking()?;
        let catalog = VoucherCatalog::new();

        booking.apply_manual_discount(ManualDiscount::Fixed(idr(20_000)), "Loyalty")?;

        let result = booking.apply_voucher(&catalog, "MISSING", date(2026, 2, 1));

        assert!(matches!(
            result,
            Err(BookingError::Voucher(VoucherError::NotFound(_)))
        ));
        assert_eq!(booking.quote().total(), idr(480_000));

        Ok(())
    }

    #[test]
    fn repricing_a_settled_booking_warns_and_demotes_payment() -> TestResult {
        let mut booking = booking()?;

        assert_eq!(booking.record_payment(idr(500_000))?, PaymentStatus::Paid);

        let update = booking.add_add_on(AddOnLineItem::custom("Frame", 1, idr(75_000))?)?;

        assert_eq!(update.payment.status, PaymentStatus::PartiallyPaid);
        assert_eq!(update.dropped_voucher, None);
        assert_eq!(
            update.payment.warning.map(|warning| warning.new_total),
            Some(idr(575_000))
        );
        assert_eq!(booking.payment_status(), PaymentStatus::PartiallyPaid);

        Ok(())
    }

    #[test]
    fn removing_an_add_on_reprices() -> TestResult {
        let mut booking = booking()?;

        booking.add_add_on(AddOnLineItem::custom("Frame", 1, idr(75_000))?)?;
        booking.remove_add_on(0)?;
        booking.remove_add_on(5)?;

        assert!(booking.add_ons().is_empty());
        assert_eq!(booking.quote().total(), idr(500_000));

        Ok(())
    }

    #[test]
    fn percentage_voucher_follows_the_subtotal() -> TestResult {
        let mut booking = booking()?;
        let catalog: VoucherCatalog<'_> = [Voucher::new(
            "WELCOME10",
            VoucherKind::Percentage(Percentage::from(Decimal::new(10, 2))),
        )]
        .into_iter()
        .collect();

        booking.apply_voucher(&catalog, "WELCOME10", date(2026, 2, 1))?;

        assert_eq!(booking.quote().discount(), idr(50_000));

        let update = booking.add_add_on(AddOnLineItem::custom("Extra print", 2, idr(50_000))?)?;

        assert_eq!(update.dropped_voucher, None);
        assert_eq!(booking.quote().discount(), idr(60_000));
        assert_eq!(booking.quote().total(), idr(540_000));

        Ok(())
    }

    #[test]
    fn voucher_is_removed_when_the_subtotal_falls_below_its_minimum() -> TestResult {
        let mut booking = booking()?;
        let catalog: VoucherCatalog<'_> =
            [Voucher::new("FLAT50K", VoucherKind::Fixed(idr(50_000)))
                .with_min_purchase(idr(550_000))]
            .into_iter()
            .collect();

        booking.add_add_on(AddOnLineItem::custom("Extra person", 1, idr(75_000))?)?;
        booking.apply_voucher(&catalog, "FLAT50K", date(2026, 2, 1))?;

        assert_eq!(booking.quote().total(), idr(525_000));

        let update = booking.remove_add_on(0)?;

        assert!(matches!(
            update.dropped_voucher,
            Some(VoucherError::BelowMinimumPurchase { ref code, .. }) if code == "FLAT50K"
        ));
        assert_eq!(booking.discount(), None);
        assert_eq!(booking.quote().discount(), idr(0));
        assert_eq!(booking.quote().total(), idr(500_000));

        Ok(())
    }

    #[test]
    fn print_order_blocks_leaving_the_delivered_states() -> TestResult {
        let mut booking = delivered_booking()?;

        booking.start_print_order()?;

        for target in [BookingStatus::Booked, BookingStatus::Cancelled] {
            let result =
                booking.change_status(target, ActorRole::Owner, at("2026-02-21T10:00:00Z")?);

            assert_eq!(
                result,
                Err(BookingError::PrintOrder(PrintOrderError::Attached(target)))
            );
            assert_eq!(booking.status(), BookingStatus::PhotosDelivered);
            assert!(booking.print_order().is_some());
        }

        booking.change_status(
            BookingStatus::Closed,
            ActorRole::Admin,
            at("2026-02-22T10:00:00Z")?,
        )?;
        booking.cancel_print_order(Confirmation::Confirmed)?;
        booking.change_status(
            BookingStatus::Booked,
            ActorRole::Owner,
            at("2026-02-23T10:00:00Z")?,
        )?;

        assert_eq!(booking.status(), BookingStatus::Booked);
        assert!(booking.print_order().is_none());

        Ok(())
    }

    #[test]
    fn restore_rejects_a_print_order_before_delivery() -> TestResult {
        let parts = BookingParts {
            code: BookingCode::new("YJS", date(2026, 2, 1), 1),
            slug: PublicSlug::generate(),
            client_name: "Dewi".to_string(),
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            amount_paid: idr(0),
            session: SessionWindow::new(
                date(2026, 2, 14),
                time(9, 0, 0, 0),
                time(11, 0, 0, 0),
            )?,
            package: Package {
                name: "Family Portrait".to_string(),
                price: idr(500_000),
            },
            add_ons: Vec::new(),
            discount: None,
            photo_link: None,
            print_order: Some(PrintOrder::new()),
            milestones: Milestones::new(at("2026-02-01T03:00:00Z")?),
        };

        assert_eq!(
            Booking::restore(parts.clone()).err(),
            Some(BookingError::PrintOrder(
                PrintOrderError::BookingNotDelivered(BookingStatus::Booked)
            ))
        );

        let delivered = BookingParts {
            status: BookingStatus::PhotosDelivered,
            photo_link: Some("https://photos.example/dewi".to_string()),
            ..parts
        };

        assert!(Booking::restore(delivered)?.print_order().is_some());

        Ok(())
    }

    #[test]
    fn print_order_requires_delivered_photos() -> TestResult {
        let mut booking = booking()?;

        assert_eq!(
            booking.start_print_order().err(),
            Some(BookingError::PrintOrder(
                PrintOrderError::BookingNotDelivered(BookingStatus::Booked)
            ))
        );

        Ok(())
    }

    #[test]
    fn print_order_lifecycle() -> TestResult {
        let mut booking = delivered_booking()?;

        booking.start_print_order()?.select_photos("IMG_0012, IMG_0040");

        assert_eq!(
            booking.start_print_order().err(),
            Some(BookingError::PrintOrder(PrintOrderError::AlreadyExists))
        );

        booking.print_order_mut()?.advance();

        assert_eq!(
            booking.print_order().map(PrintOrder::status),
            Some(PrintOrderStatus::SentToVendor)
        );

        assert_eq!(
            booking.cancel_print_order(Confirmation::Unconfirmed).err(),
            Some(BookingError::PrintOrder(
                PrintOrderError::ConfirmationRequired
            ))
        );

        let cancelled = booking.cancel_print_order(Confirmation::Confirmed)?;

        assert_eq!(cancelled.selected_photos(), Some("IMG_0012, IMG_0040"));
        assert!(booking.print_order().is_none());
        assert_eq!(
            booking.print_order_mut().err(),
            Some(BookingError::PrintOrder(PrintOrderError::NotFound))
        );

        Ok(())
    }

    #[test]
    fn closed_bookings_can_still_start_prints() -> TestResult {
        let mut booking = delivered_booking()?;

        booking.change_status(
            BookingStatus::Closed,
            ActorRole::Owner,
            at("2026-03-01T10:00:00Z")?,
        )?;

        booking.start_print_order()?;

        assert_eq!(booking.timeline().steps().len(), 8);

        Ok(())
    }
}
