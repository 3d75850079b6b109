//! Timeline
//!
//! Projects a booking (and its print order, once visible) into display-ready progress steps
//! shared by the staff dashboard and the public status page.

use std::{fmt, io};

use jiff::{Timestamp, civil::Date};
use tabled::{
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use crate::{
    booking::Booking,
    print::{ExternalPrintStep, PrintOrder, is_visible_externally},
    receipt::ReceiptError,
    status::BookingStatus,
};

/// Where a step sits relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepState {
    /// Already passed.
    Completed,

    /// The current position.
    Current,

    /// Not reached yet.
    Upcoming,
}

impl StepState {
    /// Lower-case display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            StepState::Completed => "completed",
            StepState::Current => "current",
            StepState::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the step at `index` when the current position is `current`.
pub const fn step_state(index: usize, current: usize) -> StepState {
    if index < current {
        StepState::Completed
    } else if index == current {
        StepState::Current
    } else {
        StepState::Upcoming
    }
}

/// Icon hint for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepIcon {
    /// Booked.
    Calendar,

    /// Payment confirmed.
    Wallet,

    /// Shoot done.
    Camera,

    /// Photos delivered.
    Gallery,

    /// Closed.
    Check,

    /// Photo selection.
    Selection,

    /// Printing.
    Printer,

    /// Shipped.
    Truck,

    /// Order completed.
    Package,
}

/// A real date attached to a step. Never fabricated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneDate {
    /// A planned calendar day, e.g. the session date.
    Scheduled(Date),

    /// The moment a milestone was recorded.
    Recorded(Timestamp),
}

impl fmt::Display for MilestoneDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneDate::Scheduled(date) => write!(f, "{date}"),
            MilestoneDate::Recorded(at) => write!(f, "{}", at.strftime("%Y-%m-%d %H:%M UTC")),
        }
    }
}

/// A single rendered step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineStep {
    /// Display label.
    pub label: &'static str,

    /// Icon hint.
    pub icon: StepIcon,

    /// Completed, current or upcoming.
    pub state: StepState,

    /// Milestone date, when known.
    pub date: Option<MilestoneDate>,
}

/// Projected booking progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timeline {
    /// Ordered steps for an active or closed booking.
    Progress(Vec<TimelineStep>),

    /// The booking was cancelled; renderers show a single cancelled notice.
    Cancelled {
        /// When the cancellation was recorded, if known.
        cancelled_at: Option<Timestamp>,
    },
}

impl Timeline {
    /// Steps in display order. Empty for a cancelled booking.
    pub fn steps(&self) -> &[TimelineStep] {
        match self {
            Timeline::Progress(steps) => steps,
            Timeline::Cancelled { .. } => &[],
        }
    }

    /// Whether the booking was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Timeline::Cancelled { .. })
    }

    /// The step marked current, if any.
    pub fn current(&self) -> Option<&TimelineStep> {
        self.steps()
            .iter()
            .find(|step| step.state == StepState::Current)
    }

    /// Renders the timeline as a table.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if let Timeline::Cancelled { cancelled_at } = self {
            let when = cancelled_at
                .map(|at| format!(" ({})", MilestoneDate::Recorded(at)))
                .unwrap_or_default();

            return writeln!(out, "{}{when}", BookingStatus::Cancelled.label())
                .map_err(|_err| ReceiptError::IO);
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Step", "State", "Date"]);

        for (idx, step) in self.steps().iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                step.label.to_string(),
                step.state.to_string(),
                step.date.as_ref().map(ToString::to_string).unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
    }
}

/// Projects a booking and its optional print order into timeline steps.
///
/// Without a visible print order there are five steps ending in "Closed". A print order that is
/// visible externally replaces "Closed" with its four customer-facing steps.
pub fn project_timeline(booking: &Booking<'_>, print_order: Option<&PrintOrder>) -> Timeline {
    let status = booking.status();
    let milestones = booking.milestones();

    let Some(current) = status.index() else {
        return Timeline::Cancelled {
            cancelled_at: milestones.cancelled_at,
        };
    };

    let step_date = |step: BookingStatus| match step {
        BookingStatus::Booked => Some(MilestoneDate::Recorded(milestones.created_at)),
        BookingStatus::Paid => milestones.paid_at.map(MilestoneDate::Recorded),
        BookingStatus::ShootDone => Some(MilestoneDate::Scheduled(booking.session().date())),
        BookingStatus::PhotosDelivered => milestones.delivered_at.map(MilestoneDate::Recorded),
        BookingStatus::Closed => milestones.closed_at.map(MilestoneDate::Recorded),
        BookingStatus::Cancelled => milestones.cancelled_at.map(MilestoneDate::Recorded),
    };

    let print_order = print_order.filter(|_| is_visible_externally(status));

    let Some(print_order) = print_order else {
        return Timeline::Progress(
            BookingStatus::PROGRESSION
                .into_iter()
                .enumerate()
                .map(|(idx, step)| TimelineStep {
                    label: step.label(),
                    icon: booking_icon(step),
                    state: step_state(idx, current),
                    date: step_date(step),
                })
                .collect(),
        );
    };

    let print_current = print_order.external_step().index();

    let booking_steps = BookingStatus::PROGRESSION
        .into_iter()
        .take_while(|step| *step != BookingStatus::Closed)
        .enumerate()
        .map(|(idx, step)| TimelineStep {
            label: step.label(),
            icon: booking_icon(step),
            state: if idx <= current {
                StepState::Completed
            } else {
                StepState::Upcoming
            },
            date: step_date(step),
        });

    let print_steps = ExternalPrintStep::ALL.into_iter().map(|step| TimelineStep {
        label: step.label(),
        icon: print_icon(step),
        state: step_state(step.index(), print_current),
        date: match step {
            ExternalPrintStep::Shipped => print_order.shipped_at().map(MilestoneDate::Recorded),
            _ => None,
        },
    });

    Timeline::Progress(booking_steps.chain(print_steps).collect())
}

const fn booking_icon(status: BookingStatus) -> StepIcon {
    match status {
        BookingStatus::Booked => StepIcon::Calendar,
        BookingStatus::Paid => StepIcon::Wallet,
        BookingStatus::ShootDone => StepIcon::Camera,
        BookingStatus::PhotosDelivered => StepIcon::Gallery,
        BookingStatus::Closed | BookingStatus::Cancelled => StepIcon::Check,
    }
}

const fn print_icon(step: ExternalPrintStep) -> StepIcon {
    match step {
        ExternalPrintStep::PhotoSelection => StepIcon::Selection,
        ExternalPrintStep::PrintingInProgress => StepIcon::Printer,
        ExternalPrintStep::Shipped => StepIcon::Truck,
        ExternalPrintStep::OrderCompleted => StepIcon::Package,
    }
}
