//! Studio lifecycle prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    add_ons::{AddOnLineItem, AddOnTemplate},
    booking::{Booking, BookingError, Milestones, Package, RepriceOutcome, SessionWindow},
    config::{ConfigError, StudioConfig},
    fixtures::{Fixture, FixtureError},
    identity::{BookingCode, IdentityError, PublicSlug},
    payment::{PaymentUpdate, PaymentWarning, recompute_payment_status},
    pricing::{Discount, ManualDiscount, PricingError, Quote, compute_total},
    print::{Confirmation, ExternalPrintStep, PrintOrder, PrintOrderError, PrintOrderStatus},
    receipt::{Receipt, ReceiptError},
    records::{RecordError, booking::BookingRecord},
    roles::ActorRole,
    status::{BookingStatus, PaymentStatus},
    timeline::{StepState, Timeline, TimelineStep, project_timeline},
    transitions::{StatusOptions, TransitionError, available_options, is_transition_allowed},
    vouchers::{Voucher, VoucherCatalog, VoucherError, VoucherKind},
};
