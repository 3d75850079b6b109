//! Integration tests for role-gated status changes and print fulfilment.

use jiff::{
    Timestamp,
    civil::{date, time},
};
use rusty_money::{Money, iso::IDR};
use testresult::TestResult;

use studio_lifecycle::{
    booking::{Booking, BookingError, Package, SessionWindow},
    identity::{BookingCode, PublicSlug},
    print::{Confirmation, PrintOrderError, PrintOrderStatus},
    records::booking::{StatusChange, StatusChangeRecord},
    roles::ActorRole,
    status::BookingStatus,
    transitions::TransitionError,
};

fn at(s: &str) -> TestResult<Timestamp> {
    Ok(s.parse()?)
}

fn booking() -> TestResult<Booking<'static>> {
    let booking = Booking::new(
        BookingCode::new("YJS", date(2026, 3, 2), 4),
        PublicSlug::generate(),
        "Eka".to_string(),
        SessionWindow::new(date(2026, 3, 9), time(15, 0, 0, 0), time(16, 30, 0, 0))?,
        Package {
            name: "Solo Portrait".to_string(),
            price: Money::from_minor(300_000 * 10_i64.pow(IDR.exponent), IDR),
        },
        at("2026-03-02T01:00:00Z")?,
    )?;

    Ok(booking)
}

#[test]
fn full_lifecycle_stamps_every_milestone() -> TestResult {
    let mut booking = booking()?;

    booking.change_status(BookingStatus::Paid, ActorRole::Admin, at("2026-03-03T02:00:00Z")?)?;
    booking.change_status(
        BookingStatus::ShootDone,
        ActorRole::Admin,
        at("2026-03-09T10:00:00Z")?,
    )?;
    booking.set_photo_link("https://photos.example/eka");
    booking.change_status(
        BookingStatus::PhotosDelivered,
        ActorRole::Photographer,
        at("2026-03-15T04:00:00Z")?,
    )?;
    booking.change_status(BookingStatus::Closed, ActorRole::Owner, at("2026-03-20T04:00:00Z")?)?;

    let milestones = booking.milestones();

    assert_eq!(booking.status(), BookingStatus::Closed);
    assert_eq!(milestones.paid_at, Some(at("2026-03-03T02:00:00Z")?));
    assert_eq!(milestones.delivered_at, Some(at("2026-03-15T04:00:00Z")?));
    assert_eq!(milestones.closed_at, Some(at("2026-03-20T04:00:00Z")?));
    assert_eq!(milestones.cancelled_at, None);

    Ok(())
}

#[test]
fn photographer_cannot_touch_a_paid_booking() -> TestResult {
    let mut booking = booking()?;

    booking.change_status(BookingStatus::Paid, ActorRole::Owner, at("2026-03-03T02:00:00Z")?)?;

    let result = booking.change_status(
        BookingStatus::ShootDone,
        ActorRole::Photographer,
        at("2026-03-09T10:00:00Z")?,
    );

    assert!(matches!(
        result,
        Err(BookingError::Transition(TransitionError::InvalidTransition {
            from: BookingStatus::Paid,
            to: BookingStatus::ShootDone,
            role: ActorRole::Photographer,
        }))
    ));
    assert_eq!(booking.status(), BookingStatus::Paid);
    assert_eq!(
        booking.available_options(ActorRole::Photographer).as_slice(),
        &[BookingStatus::Paid]
    );

    Ok(())
}

#[test]
fn packaging_staff_can_only_deliver_photos() -> TestResult {
    let mut booking = booking()?;

    booking.set_photo_link("https://photos.example/eka");

    assert!(
        booking
            .change_status(
                BookingStatus::Closed,
                ActorRole::PackagingStaff,
                at("2026-03-09T10:00:00Z")?,
            )
            .is_err()
    );

    booking.change_status(
        BookingStatus::PhotosDelivered,
        ActorRole::PackagingStaff,
        at("2026-03-15T04:00:00Z")?,
    )?;

    assert_eq!(booking.status(), BookingStatus::PhotosDelivered);

    Ok(())
}

#[test]
fn unknown_roles_from_requests_get_no_permissions() -> TestResult {
    let mut booking = booking()?;

    let change = StatusChange::try_from(StatusChangeRecord {
        status: "PAID".to_string(),
        role: "INTERN".to_string(),
        at: at("2026-03-03T02:00:00Z")?,
    })?;

    assert_eq!(change.role, ActorRole::Unrecognised);
    assert!(
        booking
            .change_status(change.target, change.role, change.at)
            .is_err()
    );
    assert_eq!(booking.status(), BookingStatus::Booked);

    Ok(())
}

#[test]
fn delivering_photos_requires_a_link() -> TestResult {
    let mut booking = booking()?;

    booking.set_photo_link("   ");

    assert_eq!(
        booking.change_status(
            BookingStatus::PhotosDelivered,
            ActorRole::Owner,
            at("2026-03-15T04:00:00Z")?,
        ),
        Err(BookingError::MissingPhotoLink)
    );

    Ok(())
}

#[test]
fn print_order_runs_from_selection_to_completion() -> TestResult {
    let mut booking = booking()?;

    assert!(matches!(
        booking.start_print_order(),
        Err(BookingError::PrintOrder(
            PrintOrderError::BookingNotDelivered(BookingStatus::Booked)
        ))
    ));

    booking.set_photo_link("https://photos.example/eka");
    booking.change_status(
        BookingStatus::PhotosDelivered,
        ActorRole::Owner,
        at("2026-03-15T04:00:00Z")?,
    )?;

    let order = booking.start_print_order()?;

    order.select_photos("IMG_0102, IMG_0110");
    order.set_vendor("Kolase Print");
    order.advance();
    order.advance();
    order.advance();
    order.advance();
    order.mark_shipped("JNE", "JNE0099887766", at("2026-03-25T06:00:00Z")?);

    assert_eq!(order.status(), PrintOrderStatus::Shipped);
    assert_eq!(order.advance(), PrintOrderStatus::Completed);
    assert_eq!(order.advance(), PrintOrderStatus::Completed);

    assert!(matches!(
        booking.start_print_order(),
        Err(BookingError::PrintOrder(PrintOrderError::AlreadyExists))
    ));

    Ok(())
}

#[test]
fn cancelling_a_print_order_needs_confirmation() -> TestResult {
    let mut booking = booking()?;

    booking.set_photo_link("https://photos.example/eka");
    booking.change_status(
        BookingStatus::PhotosDelivered,
        ActorRole::Owner,
        at("2026-03-15T04:00:00Z")?,
    )?;
    booking.start_print_order()?;

    assert!(matches!(
        booking.cancel_print_order(Confirmation::Unconfirmed),
        Err(BookingError::PrintOrder(PrintOrderError::ConfirmationRequired))
    ));
    assert!(booking.print_order().is_some());

    let cancelled = booking.cancel_print_order(Confirmation::Confirmed)?;

    assert_eq!(cancelled.status(), PrintOrderStatus::WaitingClientSelection);
    assert!(booking.print_order().is_none());
    assert!(matches!(
        booking.print_order_mut(),
        Err(BookingError::PrintOrder(PrintOrderError::NotFound))
    ));

    Ok(())
}

#[test]
fn owner_rewind_waits_for_the_print_order_to_be_cancelled() -> TestResult {
    let mut booking = booking()?;

    booking.set_photo_link("https://photos.example/eka");
    booking.change_status(
        BookingStatus::PhotosDelivered,
        ActorRole::Owner,
        at("2026-03-15T04:00:00Z")?,
    )?;
    booking.start_print_order()?;

    assert!(matches!(
        booking.change_status(BookingStatus::Booked, ActorRole::Owner, at("2026-03-16T04:00:00Z")?),
        Err(BookingError::PrintOrder(PrintOrderError::Attached(BookingStatus::Booked)))
    ));
    assert_eq!(booking.status(), BookingStatus::PhotosDelivered);

    booking.cancel_print_order(Confirmation::Confirmed)?;
    booking.change_status(BookingStatus::Booked, ActorRole::Owner, at("2026-03-16T05:00:00Z")?)?;

    assert_eq!(booking.status(), BookingStatus::Booked);
    assert!(booking.print_order().is_none());

    Ok(())
}
