//! Status Transitions
//!
//! Permission rules for moving a booking between statuses.
//!
//! | Role              | Allowed targets                                          |
//! |-------------------|----------------------------------------------------------|
//! | `OWNER`, `ADMIN`  | any status, including moving backwards                   |
//! | `PHOTOGRAPHER`    | `SHOOT_DONE`, `PHOTOS_DELIVERED`; nothing while `PAID`   |
//! | `PACKAGING_STAFF` | `PHOTOS_DELIVERED`                                       |
//! | anything else     | none                                                     |
//!
//! Staying on the current status is always allowed, so a selection control built from
//! [`available_options`] is never empty.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{roles::ActorRole, status::BookingStatus};

/// Candidate statuses offered to an actor.
pub type StatusOptions = SmallVec<[BookingStatus; 6]>;

/// Errors produced when validating a status change.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The actor's role does not permit the requested change.
    #[error("{role} may not move a booking from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: BookingStatus,

        /// Requested status.
        to: BookingStatus,

        /// Role of the actor.
        role: ActorRole,
    },
}

/// Whether `role` may move a booking from `current` to `target`.
pub fn is_transition_allowed(
    current: BookingStatus,
    target: BookingStatus,
    role: ActorRole,
) -> bool {
    if current == target {
        return true;
    }

    match role {
        ActorRole::Owner | ActorRole::Admin => true,
        ActorRole::Photographer => {
            current != BookingStatus::Paid
                && matches!(
                    target,
                    BookingStatus::ShootDone | BookingStatus::PhotosDelivered
                )
        }
        ActorRole::PackagingStaff => target == BookingStatus::PhotosDelivered,
        ActorRole::Unrecognised => false,
    }
}

/// Checks a status change, returning an error instead of `false`.
///
/// # Errors
///
/// Returns [`TransitionError::InvalidTransition`] if the role does not permit the change.
pub fn validate_transition(
    current: BookingStatus,
    target: BookingStatus,
    role: ActorRole,
) -> Result<(), TransitionError> {
    if is_transition_allowed(current, target, role) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition {
            from: current,
            to: target,
            role,
        })
    }
}

/// Statuses `role` may select for a booking currently at `current`, in canonical order.
///
/// Always contains `current`.
pub fn available_options(current: BookingStatus, role: ActorRole) -> StatusOptions {
    BookingStatus::ALL
        .into_iter()
        .filter(|target| is_transition_allowed(current, *target, role))
        .collect()
}

/// Whether `role` can move the booking anywhere other than where it is.
pub fn can_change_status(current: BookingStatus, role: ActorRole) -> bool {
    available_options(current, role).len() > 1
}
