//! Print Orders
//!
//! Physical print fulfilment nested under a delivered booking. Staff see all seven internal
//! steps; customers see them collapsed into four.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    status::{BookingStatus, UnknownStatusError},
    timeline::{StepState, step_state},
};

/// Errors raised by print order actions on a booking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrintOrderError {
    /// Prints can only be started once photos are delivered.
    #[error("cannot start a print order while the booking is {0}")]
    BookingNotDelivered(BookingStatus),

    /// The booking already has a print order.
    #[error("booking already has a print order")]
    AlreadyExists,

    /// The booking cannot leave the delivered states while it has a print order.
    #[error("cancel the print order before moving the booking to {0}")]
    Attached(BookingStatus),

    /// The booking has no print order.
    #[error("booking has no print order")]
    NotFound,

    /// Deleting a print order must be explicitly confirmed.
    #[error("cancelling a print order is irreversible and must be confirmed")]
    ConfirmationRequired,
}

/// Internal print fulfilment status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintOrderStatus {
    /// Waiting for the client to choose photos.
    #[default]
    WaitingClientSelection,

    /// Selection sent to the print vendor.
    SentToVendor,

    /// Vendor is printing.
    PrintingInProgress,

    /// Prints received back at the studio.
    PrintReceived,

    /// Prints being packed.
    Packaging,

    /// Handed to the courier.
    Shipped,

    /// Delivered to the client.
    Completed,
}

impl PrintOrderStatus {
    /// Every status, in order.
    pub const ALL: [PrintOrderStatus; 7] = [
        PrintOrderStatus::WaitingClientSelection,
        PrintOrderStatus::SentToVendor,
        PrintOrderStatus::PrintingInProgress,
        PrintOrderStatus::PrintReceived,
        PrintOrderStatus::Packaging,
        PrintOrderStatus::Shipped,
        PrintOrderStatus::Completed,
    ];

    /// Position in the progression.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The following status, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            PrintOrderStatus::WaitingClientSelection => Some(PrintOrderStatus::SentToVendor),
            PrintOrderStatus::SentToVendor => Some(PrintOrderStatus::PrintingInProgress),
            PrintOrderStatus::PrintingInProgress => Some(PrintOrderStatus::PrintReceived),
            PrintOrderStatus::PrintReceived => Some(PrintOrderStatus::Packaging),
            PrintOrderStatus::Packaging => Some(PrintOrderStatus::Shipped),
            PrintOrderStatus::Shipped => Some(PrintOrderStatus::Completed),
            PrintOrderStatus::Completed => None,
        }
    }

    /// Wire name, e.g. `SENT_TO_VENDOR`.
    pub const fn as_str(self) -> &'static str {
        match self {
            PrintOrderStatus::WaitingClientSelection => "WAITING_CLIENT_SELECTION",
            PrintOrderStatus::SentToVendor => "SENT_TO_VENDOR",
            PrintOrderStatus::PrintingInProgress => "PRINTING_IN_PROGRESS",
            PrintOrderStatus::PrintReceived => "PRINT_RECEIVED",
            PrintOrderStatus::Packaging => "PACKAGING",
            PrintOrderStatus::Shipped => "SHIPPED",
            PrintOrderStatus::Completed => "COMPLETED",
        }
    }

    /// Staff-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            PrintOrderStatus::WaitingClientSelection => "Waiting for Client Selection",
            PrintOrderStatus::SentToVendor => "Sent to Vendor",
            PrintOrderStatus::PrintingInProgress => "Printing in Progress",
            PrintOrderStatus::PrintReceived => "Print Received",
            PrintOrderStatus::Packaging => "Packaging",
            PrintOrderStatus::Shipped => "Shipped",
            PrintOrderStatus::Completed => "Completed",
        }
    }

    /// The customer-facing step this status collapses into.
    pub const fn external_step(self) -> ExternalPrintStep {
        match self {
            PrintOrderStatus::WaitingClientSelection => ExternalPrintStep::PhotoSelection,
            PrintOrderStatus::SentToVendor
            | PrintOrderStatus::PrintingInProgress
            | PrintOrderStatus::PrintReceived
            | PrintOrderStatus::Packaging => ExternalPrintStep::PrintingInProgress,
            PrintOrderStatus::Shipped => ExternalPrintStep::Shipped,
            PrintOrderStatus::Completed => ExternalPrintStep::OrderCompleted,
        }
    }
}

impl fmt::Display for PrintOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintOrderStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrintOrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError::new("print order", s))
    }
}

/// Customer-facing print step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExternalPrintStep {
    /// Client is choosing photos.
    PhotoSelection,

    /// Anywhere between the vendor and packaging.
    PrintingInProgress,

    /// On its way.
    Shipped,

    /// Delivered.
    OrderCompleted,
}

impl ExternalPrintStep {
    /// Every external step, in order.
    pub const ALL: [ExternalPrintStep; 4] = [
        ExternalPrintStep::PhotoSelection,
        ExternalPrintStep::PrintingInProgress,
        ExternalPrintStep::Shipped,
        ExternalPrintStep::OrderCompleted,
    ];

    /// Position among the external steps.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Customer-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            ExternalPrintStep::PhotoSelection => "Photo Selection",
            ExternalPrintStep::PrintingInProgress => "Printing in Progress",
            ExternalPrintStep::Shipped => "Shipped",
            ExternalPrintStep::OrderCompleted => "Order Completed",
        }
    }
}

impl fmt::Display for ExternalPrintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Explicit confirmation for irreversible actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The actor confirmed.
    Confirmed,

    /// The actor did not confirm.
    Unconfirmed,
}

/// One row of the staff print tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalPrintStep {
    /// Status this row represents.
    pub status: PrintOrderStatus,

    /// Position relative to the current status.
    pub state: StepState,
}

/// A print order attached to a delivered booking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintOrder {
    status: PrintOrderStatus,
    selected_photos: Option<String>,
    vendor: Option<String>,
    courier: Option<String>,
    tracking_number: Option<String>,
    shipped_at: Option<Timestamp>,
}

impl PrintOrder {
    /// Creates a print order waiting for the client's selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> PrintOrderStatus {
        self.status
    }

    /// Sets any status. Print status carries no permission or ordering restrictions.
    pub fn set_status(&mut self, status: PrintOrderStatus) {
        self.status = status;
    }

    /// Moves one step forward, stopping at `COMPLETED`. Returns the new status.
    pub fn advance(&mut self) -> PrintOrderStatus {
        if let Some(next) = self.status.next() {
            self.status = next;
        }

        self.status
    }

    /// Photos the client picked, as a free-form descriptor.
    pub fn selected_photos(&self) -> Option<&str> {
        self.selected_photos.as_deref()
    }

    /// Records the client's selection.
    pub fn select_photos(&mut self, selection: impl Into<String>) {
        self.selected_photos = Some(selection.into());
    }

    /// Print vendor.
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    /// Sets the print vendor.
    pub fn set_vendor(&mut self, vendor: impl Into<String>) {
        self.vendor = Some(vendor.into());
    }

    /// Courier carrying the prints.
    pub fn courier(&self) -> Option<&str> {
        self.courier.as_deref()
    }

    /// Courier tracking number.
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    /// When the prints were handed to the courier.
    pub fn shipped_at(&self) -> Option<Timestamp> {
        self.shipped_at
    }

    /// Moves to `SHIPPED` and records the shipment.
    pub fn mark_shipped(
        &mut self,
        courier: impl Into<String>,
        tracking_number: impl Into<String>,
        at: Timestamp,
    ) {
        self.status = PrintOrderStatus::Shipped;
        self.courier = Some(courier.into());
        self.tracking_number = Some(tracking_number.into());
        self.shipped_at = Some(at);
    }

    pub(crate) fn restore_shipment(
        &mut self,
        courier: Option<String>,
        tracking_number: Option<String>,
        shipped_at: Option<Timestamp>,
    ) {
        self.courier = courier;
        self.tracking_number = tracking_number;
        self.shipped_at = shipped_at;
    }

    pub(crate) fn restore_details(
        &mut self,
        selected_photos: Option<String>,
        vendor: Option<String>,
    ) {
        self.selected_photos = selected_photos;
        self.vendor = vendor;
    }

    /// All seven internal steps with their state.
    pub fn internal_steps(&self) -> [InternalPrintStep; 7] {
        let current = self.status.index();

        PrintOrderStatus::ALL.map(|status| InternalPrintStep {
            status,
            state: step_state(status.index(), current),
        })
    }

    /// The customer-facing step.
    pub fn external_step(&self) -> ExternalPrintStep {
        self.status.external_step()
    }
}

/// Whether a print order is shown to the customer for a booking at `booking_status`.
pub const fn is_visible_externally(booking_status: BookingStatus) -> bool {
    booking_status.has_delivered_photos()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn external_mapping_covers_every_internal_status() {
        let mapped: Vec<_> = PrintOrderStatus::ALL
            .into_iter()
            .map(PrintOrderStatus::external_step)
            .collect();

        for step in ExternalPrintStep::ALL {
            assert!(mapped.contains(&step), "{step} should be reachable");
        }
    }

    #[test]
    fn external_mapping_is_monotonic() {
        for pair in PrintOrderStatus::ALL.windows(2) {
            let [earlier, later] = pair else {
                continue;
            };

            assert!(
                earlier.external_step().index() <= later.external_step().index(),
                "{earlier} -> {later} should not move backwards externally"
            );
        }
    }

    #[test]
    fn middle_statuses_collapse_into_printing() {
        for status in [
            PrintOrderStatus::SentToVendor,
            PrintOrderStatus::PrintingInProgress,
            PrintOrderStatus::PrintReceived,
            PrintOrderStatus::Packaging,
        ] {
            assert_eq!(status.external_step().label(), "Printing in Progress");
        }
    }

    #[test]
    fn advance_walks_forward_and_stops_at_completed() {
        let mut order = PrintOrder::new();

        assert_eq!(order.status(), PrintOrderStatus::WaitingClientSelection);

        for expected in PrintOrderStatus::ALL.into_iter().skip(1) {
            assert_eq!(order.advance(), expected);
        }

        assert_eq!(order.advance(), PrintOrderStatus::Completed);
    }

    #[test]
    fn any_status_may_be_set() {
        let mut order = PrintOrder::new();

        order.set_status(PrintOrderStatus::Completed);
        order.set_status(PrintOrderStatus::SentToVendor);

        assert_eq!(order.status(), PrintOrderStatus::SentToVendor);
    }

    #[test]
    fn internal_steps_compare_by_index() {
        let mut order = PrintOrder::new();
        order.set_status(PrintOrderStatus::PrintReceived);

        let states: Vec<_> = order.internal_steps().iter().map(|step| step.state).collect();

        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Completed,
                StepState::Current,
                StepState::Upcoming,
                StepState::Upcoming,
                StepState::Upcoming,
            ]
        );
    }

    #[test]
    fn mark_shipped_records_the_shipment() -> TestResult {
        let at: Timestamp = "2026-03-02T09:30:00Z".parse()?;
        let mut order = PrintOrder::new();

        order.mark_shipped("JNE", "JNE123456", at);

        assert_eq!(order.status(), PrintOrderStatus::Shipped);
        assert_eq!(order.courier(), Some("JNE"));
        assert_eq!(order.tracking_number(), Some("JNE123456"));
        assert_eq!(order.shipped_at(), Some(at));

        Ok(())
    }

    #[test]
    fn visibility_requires_delivered_photos() {
        let visible: Vec<_> = BookingStatus::ALL
            .into_iter()
            .filter(|status| is_visible_externally(*status))
            .collect();

        assert_eq!(
            visible,
            vec![BookingStatus::PhotosDelivered, BookingStatus::Closed]
        );
    }

    #[test]
    fn print_status_parses_wire_names() -> TestResult {
        for status in PrintOrderStatus::ALL {
            assert_eq!(status.as_str().parse::<PrintOrderStatus>()?, status);
        }

        assert!(matches!(
            "LOST".parse::<PrintOrderStatus>(),
            Err(UnknownStatusError {
                kind: "print order",
                ..
            })
        ));

        Ok(())
    }
}
